// Integration testing drives the CLI as a subprocess against scratch directories.
use std::fs;
use std::path::Path;

const SONARR_DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: sonarr
  namespace: media
spec:
  replicas: 1
  selector:
    matchLabels:
      app: sonarr
  template:
    metadata:
      labels:
        app: sonarr
    spec:
      containers:
        - name: sonarr
          image: linuxserver/sonarr:latest
          ports:
            - containerPort: 8989
          volumeMounts:
            - mountPath: "/config"
              name: config
            - mountPath: "/data/nfs"
              name: nfs-storage
            - mountPath: "/data/smb-e"
              name: smb-storage-e
      volumes:
        - name: config
          emptyDir: {}
        - name: nfs-storage
          persistentVolumeClaim:
            claimName: nfs-pvc
        - name: smb-storage-e
          persistentVolumeClaim:
            claimName: smb-pvc-e
"#;

fn temelie() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("temelie").unwrap()
}

fn generate_into(destination: &Path) {
    temelie()
        .arg("generate")
        .arg(destination)
        .arg("--yes")
        .assert()
        .success();
}

#[test]
fn generate_writes_the_reference_tree() {
    let scratch = tempfile::tempdir().unwrap();
    let destination = scratch.path().join("homelab-gitops");

    generate_into(&destination);

    let deployment = fs::read_to_string(destination.join("apps/media/sonarr/deployment.yaml")).unwrap();
    assert_eq!(deployment, SONARR_DEPLOYMENT);

    for path in [
        "README.md",
        "clusters/local-k3s/kustomization.yaml",
        "infrastructure/storage/smb-secret.yaml",
        "infrastructure/networking/traefik/helmrelease.yaml",
        "apps/media/qbittorrent/ingress.yaml",
    ] {
        assert!(destination.join(path).is_file(), "missing {}", path);
    }
}

#[test]
fn regenerating_with_force_is_idempotent() {
    let scratch = tempfile::tempdir().unwrap();
    let destination = scratch.path().join("homelab-gitops");

    generate_into(&destination);
    let first = fs::read_to_string(destination.join("infrastructure/storage/kustomization.yaml")).unwrap();

    temelie()
        .arg("generate")
        .arg(&destination)
        .arg("--force")
        .arg("--yes")
        .assert()
        .success();

    let second = fs::read_to_string(destination.join("infrastructure/storage/kustomization.yaml")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn generate_refuses_an_existing_destination_without_force() {
    let scratch = tempfile::tempdir().unwrap();
    let destination = scratch.path().join("homelab-gitops");
    fs::create_dir_all(&destination).unwrap();

    temelie()
        .arg("generate")
        .arg(&destination)
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicates::str::contains("already exists"));
}

#[test]
fn site_settings_flow_into_the_emitted_manifests() {
    let scratch = tempfile::tempdir().unwrap();
    let destination = scratch.path().join("homelab-gitops");
    let settings = scratch.path().join("temelie.toml");
    fs::write(&settings, "domain = \"lab.example\"\n").unwrap();

    temelie()
        .arg("generate")
        .arg(&destination)
        .arg("--yes")
        .arg("--config")
        .arg(&settings)
        .assert()
        .success();

    let ingress = fs::read_to_string(destination.join("apps/media/sonarr/ingress.yaml")).unwrap();
    assert!(ingress.contains("- host: sonarr.lab.example"));
}

#[test]
fn verify_accepts_a_freshly_generated_tree() {
    let scratch = tempfile::tempdir().unwrap();
    let destination = scratch.path().join("homelab-gitops");

    generate_into(&destination);

    temelie()
        .arg("verify")
        .arg(&destination)
        .assert()
        .success()
        .stdout(predicates::str::contains("ok"));
}

#[test]
fn verify_flags_a_dangling_kustomization_resource() {
    let scratch = tempfile::tempdir().unwrap();
    let destination = scratch.path().join("homelab-gitops");

    generate_into(&destination);
    fs::remove_file(destination.join("apps/media/radarr/service.yaml")).unwrap();

    temelie()
        .arg("verify")
        .arg(&destination)
        .assert()
        .failure()
        .stderr(predicates::str::contains("service.yaml"));
}

#[test]
fn preview_touches_nothing() {
    let scratch = tempfile::tempdir().unwrap();
    let destination = scratch.path().join("homelab-gitops");

    temelie()
        .arg("preview")
        .arg(&destination)
        .assert()
        .success()
        .stdout(predicates::str::contains("Legend"));

    assert!(!destination.exists());
}

#[test]
fn git_init_leaves_an_initial_commit() {
    let scratch = tempfile::tempdir().unwrap();
    let destination = scratch.path().join("homelab-gitops");

    temelie()
        .arg("generate")
        .arg(&destination)
        .arg("--yes")
        .arg("--git-init")
        .assert()
        .success();

    assert!(destination.join(".git").is_dir());
}
