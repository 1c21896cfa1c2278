//! # VM translator
//!
//! Parses VM text (C6) and emits Machine assembly (C7), implementing the
//! segment memory model and the call/return calling convention.

pub mod codegen;
pub mod command;
pub mod error;

use codegen::AssemblyGenerator;
use command::{parse_line, strip_comment};
use error::VmError;

/// Translate one file's VM text. `file_stem` names its static segment and
/// feeds return-label derivation. No bootstrap preamble is emitted — that
/// only happens for [`translate_folder`].
pub fn translate_file(source: &str, file_stem: &str) -> Result<String, VmError> {
    let generator = AssemblyGenerator::new(file_stem);
    let mut out = String::new();
    for (i, raw_line) in source.lines().enumerate() {
        let line_number = i + 1;
        if let Some(command) = parse_line(raw_line, line_number)? {
            let stripped_line = strip_comment(raw_line);
            out.push_str(&generator.translate(&command, stripped_line, line_number)?);
        }
    }
    Ok(out)
}

/// Translate a folder's worth of named VM files into one assembly program,
/// with a bootstrap preamble (`SP = 256; call Sys.init 0`) ahead of the
/// concatenated output. Each file's translated output is wrapped in a
/// banner comment naming its path, and each file keeps its own stem as its
/// static-segment namespace. `files` must already be in the caller's
/// desired iteration order (§5: lexicographic recursive directory order).
pub fn translate_folder(files: &[(String, String)]) -> Result<String, VmError> {
    let mut out = AssemblyGenerator::bootstrap();
    for (path, source) in files {
        let file_stem = std::path::Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path)
            .to_string();
        let rule = "/".repeat(path.len() + 3);
        out.push_str(&format!("{rule}\n// {path}\n{rule}\n"));
        out.push_str(&translate_file(source, &file_stem)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_constant_then_pop_local_translates() {
        let asm = translate_file("push constant 17\npop local 2\n", "main").unwrap();
        assert!(!asm.is_empty());
    }

    #[test]
    fn static_segment_after_pop_static_names_the_file() {
        let asm = translate_file("pop static 3\n", "some_file").unwrap();
        assert!(asm.contains("pop static 3"));
        assert!(asm.contains("@some_file.3"));
    }

    #[test]
    fn pop_temp_8_is_an_error() {
        assert!(translate_file("pop temp 8\n", "main").is_err());
    }

    #[test]
    fn folder_translation_emits_bootstrap_and_file_banners() {
        let files = vec![
            ("Main.vm".to_string(), "call Sys.init 0\n".to_string()),
            ("Sys.vm".to_string(), "function Sys.init 0\nreturn\n".to_string()),
        ];
        let asm = translate_folder(&files).unwrap();
        assert!(asm.starts_with("@256\nD=A\n@SP\nM=D\n"));
        assert!(asm.contains("// Main.vm"));
        assert!(asm.contains("// Sys.vm"));
    }

    #[test]
    fn banner_rule_matches_the_header_line_length() {
        let files = vec![("Main.vm".to_string(), "add\n".to_string())];
        let asm = translate_folder(&files).unwrap();
        let header = "// Main.vm";
        let rule = "/".repeat(header.len());
        let expected = format!("{rule}\n{header}\n{rule}\n");
        assert!(asm.contains(&expected));
    }

    #[test]
    fn inline_comment_is_stripped_before_being_echoed_back() {
        let asm = translate_file("push constant 1 // one\n", "main").unwrap();
        assert!(asm.contains("// push constant 1\n"));
        assert!(!asm.contains("// push constant 1 // one"));
    }
}
