use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use nand2hack::jack::compile_class;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: jackc <file.jack|dir>");
        process::exit(2);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("no such file or directory: {}", path.display());
        process::exit(2);
    }

    if path.is_dir() {
        let files = collect_files(path, "jack");
        if files.is_empty() {
            eprintln!("no .jack files found under {}", path.display());
            process::exit(4);
        }
        for file in files {
            compile_file(&file);
        }
    } else {
        if path.extension().and_then(|e| e.to_str()) != Some("jack") {
            eprintln!("expected a .jack file, got {}", path.display());
            process::exit(3);
        }
        compile_file(path);
    }
}

fn compile_file(path: &Path) {
    let source = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("failed to read {}: {err}", path.display());
        process::exit(2);
    });

    match compile_class(&source) {
        Ok(vm_text) => {
            let out_path = path.with_extension("vm");
            if let Err(err) = fs::write(&out_path, vm_text) {
                eprintln!("failed to write {}: {err}", out_path.display());
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{}: {err}", path.display());
            process::exit(1);
        }
    }
}

/// Recursively collect files with the given extension, in lexicographic
/// directory-traversal order (§5).
fn collect_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return out;
    };
    let mut entries: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            out.extend(collect_files(&entry, extension));
        } else if entry.extension().and_then(|e| e.to_str()) == Some(extension) {
            out.push(entry);
        }
    }
    out
}
