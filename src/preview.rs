use crate::vfs::VirtualFS;
use colored::Colorize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Arena-backed tree of the entries to be written, rooted at the destination.
#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug)]
struct Node {
    name: String,
    children: Vec<usize>,
    is_file: bool,
}

impl Tree {
    fn build(vfs: &VirtualFS, destination: &Path) -> Self {
        let root_name = destination
            .file_name()
            .map(|os| os.to_string_lossy().to_string())
            .unwrap_or_else(|| destination.display().to_string());

        let mut tree = Tree {
            nodes: vec![Node {
                name: root_name,
                children: Vec::new(),
                is_file: false,
            }],
        };

        // map relative path to arena index; the empty path is the root
        let mut lookup: HashMap<PathBuf, usize> = HashMap::new();
        lookup.insert(PathBuf::new(), 0);

        for entry in &vfs.entries {
            let parent = entry.path.parent().unwrap_or_else(|| Path::new(""));

            let Some(&parent_index) = lookup.get(parent) else {
                log::debug!(
                    "parent {} not staged for {}",
                    parent.display(),
                    entry.path.display()
                );
                continue;
            };

            let name = entry
                .path
                .file_name()
                .map(|os| os.to_string_lossy().to_string())
                .unwrap_or_default();

            let index = tree.nodes.len();
            tree.nodes.push(Node {
                name,
                children: Vec::new(),
                is_file: entry.is_file,
            });
            tree.nodes[parent_index].children.push(index);

            lookup.insert(entry.path.clone(), index);
        }

        tree
    }

    fn print(&self, index: usize, prefix: &str, is_last: bool) {
        let node = &self.nodes[index];

        let connector = if is_last {
            "└── ".yellow()
        } else {
            "├── ".yellow()
        };
        let name = if node.is_file {
            node.name.green()
        } else {
            node.name.blue()
        };
        println!("{}{}{}", prefix.yellow(), connector, name);

        let child_prefix = if is_last {
            format!("{}    ", prefix)
        } else {
            format!("{}│   ", prefix)
        };

        let len = node.children.len();
        for (i, &child) in node.children.iter().enumerate() {
            self.print(child, &child_prefix, i == len - 1);
        }
    }
}

/// Prints the staged tree the way it will land under `destination`.
pub fn preview_as_tree(vfs: &VirtualFS, destination: &Path) {
    let tree = Tree::build(vfs, destination);

    println!(
        "Legend: {} = (directory), {} = (file)\n",
        "blue".blue(),
        "green".green()
    );

    tree.print(0, "", true);
}
