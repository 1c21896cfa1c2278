use nand2hack::asm::assemble;
use nand2hack::jack::compile_class;
use nand2hack::vm::{translate_file, translate_folder};

/// Run the full three-stage pipeline on one class's HLL source and return
/// the final `.hack` binary text.
fn run_pipeline(source: &str, file_stem: &str) -> String {
    let vm = compile_class(source).expect("HLL compilation failed");
    let asm = translate_file(&vm, file_stem).expect("VM translation failed");
    assemble(&asm).expect("assembly failed")
}

#[test]
fn s10_void_method_compiles_to_the_documented_vm_text() {
    let vm = compile_class("class Main { function void foo() { return; } }").unwrap();
    assert_eq!(vm, "function Main.foo 0\npush constant 0\nreturn\n");
}

#[test]
fn s9_class_without_braces_is_a_structure_error() {
    assert!(compile_class("class Abc").is_err());
}

#[test]
fn s9_identifier_cannot_start_with_a_digit() {
    let source = "class A { function void f() { let 1abc = 5; return; } }";
    assert!(compile_class(source).is_err());
}

#[test]
fn s6_integer_constant_over_32767_is_a_parse_error() {
    let source = "class A { function void f() { let x = 32768; return; } }";
    assert!(compile_class(source).is_err());
}

#[test]
fn s6_unterminated_string_is_a_parse_error() {
    let source = "class A { function void f() { let x = \"unterminated; return; } }";
    assert!(compile_class(source).is_err());
}

#[test]
fn full_pipeline_produces_binary_words_for_a_simple_class() {
    let source = "class Main { function void main() { do Main.run(); return; } }";
    let hack = run_pipeline(source, "Main");
    assert!(!hack.is_empty());
    for line in hack.lines() {
        assert_eq!(line.len(), 16);
        assert!(line.chars().all(|c| c == '0' || c == '1'));
    }
}

#[test]
fn full_pipeline_handles_a_constructor_and_a_method() {
    let source = "\
        class Point {\n\
            field int x, y;\n\
            constructor Point new(int ax, int ay) {\n\
                let x = ax;\n\
                let y = ay;\n\
                return this;\n\
            }\n\
            method int getX() {\n\
                return x;\n\
            }\n\
        }";
    let hack = run_pipeline(source, "Point");
    assert!(!hack.is_empty());
}

#[test]
fn folder_translation_links_multiple_classes_with_bootstrap() {
    let main_vm = compile_class(
        "class Main { function void main() { do Sys.init(); return; } }",
    )
    .unwrap();
    let sys_vm = compile_class("class Sys { function void init() { return; } }").unwrap();

    let files = vec![
        ("Main.vm".to_string(), main_vm),
        ("Sys.vm".to_string(), sys_vm),
    ];
    let asm = translate_folder(&files).unwrap();
    assert!(asm.starts_with("@256\nD=A\n@SP\nM=D\n"));

    let hack = assemble(&asm).unwrap();
    for line in hack.lines() {
        assert_eq!(line.len(), 16);
    }
}

#[test]
fn s1_assembler_literal_r5() {
    assert_eq!(assemble("@R5").unwrap(), "0000000000000101");
}

#[test]
fn s4_assembler_overflow_is_an_error() {
    assert!(assemble("@32768").is_err());
}

#[test]
fn s7_translator_static_segment_names_the_file() {
    let asm = translate_file("push constant 17\npop static 3\n", "some_file").unwrap();
    assert!(asm.contains("@some_file.3"));
}

#[test]
fn s8_translator_rejects_out_of_range_temp() {
    assert!(translate_file("pop temp 8\n", "main").is_err());
}
