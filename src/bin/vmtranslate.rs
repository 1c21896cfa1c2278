use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use nand2hack::vm::{translate_file, translate_folder};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: vmtranslate <file.vm|dir>");
        process::exit(2);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("no such file or directory: {}", path.display());
        process::exit(2);
    }

    if path.is_dir() {
        let files = collect_files(path, "vm");
        if files.is_empty() {
            eprintln!("no .vm files found under {}", path.display());
            process::exit(4);
        }
        let named: Vec<(String, String)> = files
            .iter()
            .map(|p| {
                let source = fs::read_to_string(p).unwrap_or_else(|err| {
                    eprintln!("failed to read {}: {err}", p.display());
                    process::exit(2);
                });
                (p.display().to_string(), source)
            })
            .collect();

        match translate_folder(&named) {
            Ok(asm) => {
                let dir_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("out");
                let out_path = path.join(format!("{dir_name}.asm"));
                if let Err(err) = fs::write(&out_path, asm) {
                    eprintln!("failed to write {}: {err}", out_path.display());
                    process::exit(1);
                }
            }
            Err(err) => {
                eprintln!("{err}");
                process::exit(1);
            }
        }
    } else {
        if path.extension().and_then(|e| e.to_str()) != Some("vm") {
            eprintln!("expected a .vm file, got {}", path.display());
            process::exit(3);
        }
        let source = fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {err}", path.display());
            process::exit(2);
        });
        let file_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("out");
        match translate_file(&source, file_stem) {
            Ok(asm) => {
                let out_path = path.with_extension("asm");
                if let Err(err) = fs::write(&out_path, asm) {
                    eprintln!("failed to write {}: {err}", out_path.display());
                    process::exit(1);
                }
            }
            Err(err) => {
                eprintln!("{err}");
                process::exit(1);
            }
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
