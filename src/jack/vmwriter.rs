//! # VM Writer (C4)
//!
//! Thin emitter producing one textual VM command per line. No buffering
//! contract beyond the `String` it appends to; line ordering is preserved
//! exactly as the code generator calls these methods.

#[derive(Debug, Default)]
pub struct VmWriter {
    out: String,
}

impl VmWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_push(&mut self, segment: &str, index: u16) {
        self.out.push_str(&format!("push {segment} {index}\n"));
    }

    pub fn write_pop(&mut self, segment: &str, index: u16) {
        self.out.push_str(&format!("pop {segment} {index}\n"));
    }

    pub fn write_arithmetic(&mut self, command: &str) {
        self.out.push_str(command);
        self.out.push('\n');
    }

    pub fn write_label(&mut self, label: &str) {
        self.out.push_str(&format!("label {label}\n"));
    }

    pub fn write_goto(&mut self, label: &str) {
        self.out.push_str(&format!("goto {label}\n"));
    }

    pub fn write_if_goto(&mut self, label: &str) {
        self.out.push_str(&format!("if-goto {label}\n"));
    }

    pub fn write_call(&mut self, name: &str, n_args: u16) {
        self.out.push_str(&format!("call {name} {n_args}\n"));
    }

    pub fn write_function(&mut self, name: &str, n_locals: u16) {
        self.out.push_str(&format!("function {name} {n_locals}\n"));
    }

    pub fn write_return(&mut self) {
        self.out.push_str("return\n");
    }

    pub fn finish(self) -> String {
        self.out
    }
}
