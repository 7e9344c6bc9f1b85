//! The blueprint of the emitted GitOps tree: every directory, file name and
//! literal manifest template, in the order they are written.

/// A media app exposed behind traefik as `<name>.<domain>`.
#[derive(Debug, Clone, Copy)]
pub struct AppSpec {
    pub name: &'static str,
    pub image: &'static str,
    pub port: u16,
}

pub const MEDIA_APPS: [AppSpec; 4] = [
    AppSpec {
        name: "sonarr",
        image: "linuxserver/sonarr:latest",
        port: 8989,
    },
    AppSpec {
        name: "radarr",
        image: "linuxserver/radarr:latest",
        port: 7878,
    },
    AppSpec {
        name: "prowlarr",
        image: "linuxserver/prowlarr:latest",
        port: 9696,
    },
    AppSpec {
        name: "qbittorrent",
        image: "linuxserver/qbittorrent:latest",
        port: 8080,
    },
];

/// One file to emit: its name and the tera template it is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct FileTemplate {
    pub name: &'static str,
    pub body: &'static str,
}

/// One directory of the tree. `app` carries the per-app context values when
/// the directory belongs to a media app; an empty `path` means the tree root.
#[derive(Debug, Clone)]
pub struct DirTemplate {
    pub path: String,
    pub files: Vec<FileTemplate>,
    pub app: Option<AppSpec>,
}

const CLUSTER_KUSTOMIZATION: &str = r#"resources:
  - ../../infrastructure/lens
  - ../../infrastructure/smb-csi
  - ../../infrastructure/storage
  - ../../infrastructure/networking/traefik
  - ../../apps/media/sonarr
  - ../../apps/media/radarr
  - ../../apps/media/prowlarr
  - ../../apps/media/qbittorrent
"#;

const SMB_SECRET: &str = r#"apiVersion: v1
kind: Secret
metadata:
  name: smb-secret
  namespace: {{ namespace }}
type: Opaque
stringData:
  username: {{ smb_username }}
  password: {{ smb_password }}
"#;

const SMB_PV: &str = r#"apiVersion: v1
kind: PersistentVolume
metadata:
  name: smb-share-e
spec:
  capacity:
    storage: {{ smb_capacity }}
  accessModes:
    - ReadWriteMany
  persistentVolumeReclaimPolicy: Retain
  csi:
    driver: smb.csi.k8s.io
    volumeHandle: smb-share-e
    volumeAttributes:
      source: "{{ smb_source }}"
    nodeStageSecretRef:
      name: smb-secret
      namespace: {{ namespace }}
"#;

const SMB_PVC: &str = r#"apiVersion: v1
kind: PersistentVolumeClaim
metadata:
  name: smb-pvc-e
  namespace: {{ namespace }}
spec:
  accessModes:
    - ReadWriteMany
  resources:
    requests:
      storage: {{ smb_capacity }}
  volumeName: smb-share-e
  storageClassName: ""
"#;

const NFS_PV: &str = r#"apiVersion: v1
kind: PersistentVolume
metadata:
  name: nfs-media
spec:
  capacity:
    storage: {{ nfs_capacity }}
  accessModes:
    - ReadWriteMany
  persistentVolumeReclaimPolicy: Retain
  nfs:
    server: {{ nfs_server }}
    path: "{{ nfs_path }}"
"#;

const NFS_PVC: &str = r#"apiVersion: v1
kind: PersistentVolumeClaim
metadata:
  name: nfs-pvc
  namespace: {{ namespace }}
spec:
  accessModes:
    - ReadWriteMany
  resources:
    requests:
      storage: {{ nfs_capacity }}
  volumeName: nfs-media
  storageClassName: ""
"#;

const STORAGE_KUSTOMIZATION: &str = r#"resources:
  - smb-secret.yaml
  - smb-pv.yaml
  - smb-pvc.yaml
  - nfs-pv.yaml
  - nfs-pvc.yaml
"#;

const SMB_CSI_HELMREPOSITORY: &str = r#"apiVersion: source.toolkit.fluxcd.io/v1beta2
kind: HelmRepository
metadata:
  name: kubernetes-csi
  namespace: flux-system
spec:
  interval: 10m
  url: https://raw.githubusercontent.com/kubernetes-csi/csi-driver-smb/master/charts
"#;

const SMB_CSI_HELMRELEASE: &str = r#"apiVersion: helm.toolkit.fluxcd.io/v2beta1
kind: HelmRelease
metadata:
  name: csi-driver-smb
  namespace: kube-system
spec:
  interval: 10m
  chart:
    spec:
      chart: csi-driver-smb
      version: "latest"
      sourceRef:
        kind: HelmRepository
        name: kubernetes-csi
        namespace: flux-system
      interval: 5m
  install:
    remediation:
      retries: 3
  upgrade:
    remediation:
      retries: 3
"#;

const LENS_HELMREPOSITORY: &str = r#"apiVersion: source.toolkit.fluxcd.io/v1beta2
kind: HelmRepository
metadata:
  name: lens
  namespace: flux-system
spec:
  interval: 10m
  url: https://k8slens.dev
"#;

const LENS_HELMRELEASE: &str = r#"apiVersion: helm.toolkit.fluxcd.io/v2beta1
kind: HelmRelease
metadata:
  name: lens-metrics
  namespace: kube-system
spec:
  interval: 10m
  chart:
    spec:
      chart: lens-metrics
      version: "latest"
      sourceRef:
        kind: HelmRepository
        name: lens
        namespace: flux-system
      interval: 5m
  install:
    remediation:
      retries: 3
  upgrade:
    remediation:
      retries: 3
"#;

const LENS_CONFIGMAP: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: lens-config
  namespace: kube-system
data:
  cluster-metrics: "true"
  dashboard: "enabled"
"#;

const TRAEFIK_HELMREPOSITORY: &str = r#"apiVersion: source.toolkit.fluxcd.io/v1beta2
kind: HelmRepository
metadata:
  name: traefik
  namespace: flux-system
spec:
  interval: 10m
  url: https://helm.traefik.io/traefik
"#;

const TRAEFIK_HELMRELEASE: &str = r#"apiVersion: helm.toolkit.fluxcd.io/v2beta1
kind: HelmRelease
metadata:
  name: traefik
  namespace: kube-system
spec:
  interval: 10m
  chart:
    spec:
      chart: traefik
      version: "{{ traefik_version }}"
      sourceRef:
        kind: HelmRepository
        name: traefik
        namespace: flux-system
  values:
    deployment:
      podAnnotations:
        "prometheus.io/scrape": "true"
        "prometheus.io/port": "8082"
    ports:
      web:
        redirectTo: websecure
      websecure:
        tls:
          enabled: true
    providers:
      kubernetesCRD: {}
      kubernetesIngress: {}
    certificatesResolvers:
      letsencrypt:
        acme:
          email: {{ acme_email }}
          storage: /data/acme.json
          httpChallenge:
            entryPoint: web
"#;

const HELM_PAIR_KUSTOMIZATION: &str = r#"resources:
  - helmrepository.yaml
  - helmrelease.yaml
"#;

const LENS_KUSTOMIZATION: &str = r#"resources:
  - helmrepository.yaml
  - helmrelease.yaml
  - configmap.yaml
"#;

const APP_DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{ app }}
  namespace: {{ namespace }}
spec:
  replicas: 1
  selector:
    matchLabels:
      app: {{ app }}
  template:
    metadata:
      labels:
        app: {{ app }}
    spec:
      containers:
        - name: {{ app }}
          image: {{ image }}
          ports:
            - containerPort: {{ port }}
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

const APP_SERVICE: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: {{ app }}
  namespace: {{ namespace }}
spec:
  ports:
    - port: 80
      targetPort: {{ port }}
      protocol: TCP
      name: http
  selector:
    app: {{ app }}
  type: ClusterIP
"#;

const APP_INGRESS: &str = r#"apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: {{ app }}
  namespace: {{ namespace }}
  annotations:
    traefik.ingress.kubernetes.io/router.entrypoints: websecure
    traefik.ingress.kubernetes.io/router.tls: "true"
    traefik.ingress.kubernetes.io/router.tls.certresolver: letsencrypt
spec:
  rules:
    - host: {{ app }}.{{ domain }}
      http:
        paths:
          - path: /
            pathType: Prefix
            backend:
              service:
                name: {{ app }}
                port:
                  number: 80
"#;

const APP_KUSTOMIZATION: &str = r#"resources:
  - deployment.yaml
  - service.yaml
  - ingress.yaml
"#;

const README: &str = r#"# Homelab GitOps Repository

## Overview
This repository manages a Kubernetes homelab using FluxCD for GitOps automation. It deploys:

- **Media Applications:** Sonarr, Radarr, Prowlarr, and qBittorrent
  Each application mounts persistent storage from:
  - **NFS** ({{ nfs_server }}{{ nfs_path }})
  - **SMB/Windows Share** ({{ smb_source | trim_start_matches(pat="//") }})

- **SMB CSI Driver:** Managed via a HelmRelease
- **Traefik Reverse Proxy:** Routes HTTPS requests (with Let's Encrypt TLS) based on subdomains (e.g. `sonarr.{{ domain }}`)
- **Lens:** For cluster monitoring and insights

**Note:**
- The public domain **{{ domain }}** is not pointed to the homelab, but local DNS resolves subdomains such as `sonarr.{{ domain }}` to the cluster.
- Traefik uses an ACME HTTP challenge to obtain valid certificates from Let's Encrypt. Ensure your challenge configuration is compatible with your network setup (or consider using a DNS challenge if needed).

## Folder Structure
```
.
├── clusters/
│   └── local-k3s/
├── infrastructure/
│   ├── storage/
│   ├── smb-csi/
│   ├── lens/
│   └── networking/
│       └── traefik/
└── apps/
    └── media/
        ├── sonarr/
        ├── radarr/
        ├── prowlarr/
        └── qbittorrent/
```
"#;

/// Builds the full tree description, directories in emission order.
pub fn blueprint() -> Vec<DirTemplate> {
    let mut dirs = vec![
        DirTemplate {
            path: String::new(),
            files: vec![FileTemplate {
                name: "README.md",
                body: README,
            }],
            app: None,
        },
        DirTemplate {
            path: "clusters/local-k3s".into(),
            files: vec![
                FileTemplate {
                    name: "kustomization.yaml",
                    body: CLUSTER_KUSTOMIZATION,
                },
                FileTemplate {
                    name: "apps.yaml",
                    body: "# (Cluster apps overlay)",
                },
                FileTemplate {
                    name: "storage.yaml",
                    body: "# (Cluster storage overlay)",
                },
                FileTemplate {
                    name: "networking.yaml",
                    body: "# (Cluster networking overlay)",
                },
            ],
            app: None,
        },
        DirTemplate {
            path: "infrastructure/storage".into(),
            files: vec![
                FileTemplate {
                    name: "smb-secret.yaml",
                    body: SMB_SECRET,
                },
                FileTemplate {
                    name: "smb-pv.yaml",
                    body: SMB_PV,
                },
                FileTemplate {
                    name: "smb-pvc.yaml",
                    body: SMB_PVC,
                },
                FileTemplate {
                    name: "nfs-pv.yaml",
                    body: NFS_PV,
                },
                FileTemplate {
                    name: "nfs-pvc.yaml",
                    body: NFS_PVC,
                },
                FileTemplate {
                    name: "kustomization.yaml",
                    body: STORAGE_KUSTOMIZATION,
                },
            ],
            app: None,
        },
        DirTemplate {
            path: "infrastructure/smb-csi".into(),
            files: vec![
                FileTemplate {
                    name: "helmrepository.yaml",
                    body: SMB_CSI_HELMREPOSITORY,
                },
                FileTemplate {
                    name: "helmrelease.yaml",
                    body: SMB_CSI_HELMRELEASE,
                },
                FileTemplate {
                    name: "kustomization.yaml",
                    body: HELM_PAIR_KUSTOMIZATION,
                },
            ],
            app: None,
        },
        DirTemplate {
            path: "infrastructure/lens".into(),
            files: vec![
                FileTemplate {
                    name: "helmrepository.yaml",
                    body: LENS_HELMREPOSITORY,
                },
                FileTemplate {
                    name: "helmrelease.yaml",
                    body: LENS_HELMRELEASE,
                },
                FileTemplate {
                    name: "configmap.yaml",
                    body: LENS_CONFIGMAP,
                },
                FileTemplate {
                    name: "kustomization.yaml",
                    body: LENS_KUSTOMIZATION,
                },
            ],
            app: None,
        },
        DirTemplate {
            path: "infrastructure/networking/traefik".into(),
            files: vec![
                FileTemplate {
                    name: "helmrepository.yaml",
                    body: TRAEFIK_HELMREPOSITORY,
                },
                FileTemplate {
                    name: "helmrelease.yaml",
                    body: TRAEFIK_HELMRELEASE,
                },
                FileTemplate {
                    name: "kustomization.yaml",
                    body: HELM_PAIR_KUSTOMIZATION,
                },
            ],
            app: None,
        },
    ];

    for app in MEDIA_APPS {
        dirs.push(DirTemplate {
            path: format!("apps/media/{}", app.name),
            files: vec![
                FileTemplate {
                    name: "deployment.yaml",
                    body: APP_DEPLOYMENT,
                },
                FileTemplate {
                    name: "service.yaml",
                    body: APP_SERVICE,
                },
                FileTemplate {
                    name: "ingress.yaml",
                    body: APP_INGRESS,
                },
                FileTemplate {
                    name: "kustomization.yaml",
                    body: APP_KUSTOMIZATION,
                },
            ],
            app: Some(app),
        });
    }

    dirs
}
