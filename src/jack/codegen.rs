//! # HLL Code Generator (C5)
//!
//! Walks the AST and drives the symbol table (C3) and VM writer (C4). See
//! §4.5 for the statement/expression/term lowering rules this follows.

use crate::jack::ast::*;
use crate::jack::error::{ErrorKind, JackError, Span};
use crate::jack::symtab::{SymbolKind, SymbolTable};
use crate::jack::vmwriter::VmWriter;

pub struct CodeGenerator {
    symtab: SymbolTable,
    writer: VmWriter,
    class_name: String,
    subroutine_name: String,
    label_counter: u32,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            symtab: SymbolTable::new(),
            writer: VmWriter::new(),
            class_name: String::new(),
            subroutine_name: String::new(),
            label_counter: 0,
        }
    }

    pub fn compile_class(mut self, class: &Class) -> Result<String, JackError> {
        self.class_name = class.name.clone();
        self.label_counter = 0;

        for cv in &class.class_vars {
            let kind = match cv.kind {
                ClassVarKind::Static => SymbolKind::Static,
                ClassVarKind::Field => SymbolKind::Field,
            };
            for name in &cv.names {
                self.symtab.define(name, cv.var_type.clone(), kind)?;
            }
        }

        for sub in &class.subroutines {
            self.compile_subroutine(sub)?;
        }

        Ok(self.writer.finish())
    }

    fn compile_subroutine(&mut self, sub: &Subroutine) -> Result<(), JackError> {
        self.symtab.start_subroutine();
        self.subroutine_name = sub.name.clone();

        if sub.kind == SubroutineKind::Method {
            self.symtab.define(
                "this",
                Type::Class(self.class_name.clone()),
                SymbolKind::Argument,
            )?;
        }
        for param in &sub.params {
            self.symtab
                .define(&param.name, param.param_type.clone(), SymbolKind::Argument)?;
        }

        let mut n_locals: u16 = 0;
        for local in &sub.body.locals {
            for name in &local.names {
                self.symtab
                    .define(name, local.var_type.clone(), SymbolKind::Local)?;
                n_locals += 1;
            }
        }

        self.writer
            .write_function(&format!("{}.{}", self.class_name, sub.name), n_locals);

        match sub.kind {
            SubroutineKind::Constructor => {
                let field_count = self.symtab.field_count();
                if field_count > 0 {
                    self.writer.write_push("constant", field_count);
                    self.writer.write_call("Memory.alloc", 1);
                    self.writer.write_pop("pointer", 0);
                }
            }
            SubroutineKind::Method => {
                self.writer.write_push("argument", 0);
                self.writer.write_pop("pointer", 0);
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements(&sub.body.statements)?;
        Ok(())
    }

    fn compile_statements(&mut self, statements: &[Statement]) -> Result<(), JackError> {
        for statement in statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), JackError> {
        match statement {
            Statement::Let { name, index, expr } => self.compile_let(name, index, expr),
            Statement::If {
                cond,
                then_branch,
                else_branch,
            } => self.compile_if(cond, then_branch, else_branch.as_deref()),
            Statement::While { cond, body } => self.compile_while(cond, body),
            Statement::Do { call } => {
                self.compile_call(call)?;
                self.writer.write_pop("temp", 0);
                Ok(())
            }
            Statement::Return { expr } => self.compile_return(expr.as_ref()),
        }
    }

    fn compile_let(
        &mut self,
        name: &str,
        index: &Option<Expression>,
        expr: &Expression,
    ) -> Result<(), JackError> {
        match index {
            None => {
                self.compile_expression(expr)?;
                let entry = self.symtab.lookup(name)?.clone();
                self.writer
                    .write_pop(entry.kind.segment(), entry.index);
                Ok(())
            }
            Some(index_expr) => {
                // Address computed first so the RHS can itself reference
                // `that` via a nested array expression without clobbering
                // the target address (§4.5).
                let entry = self.symtab.lookup(name)?.clone();
                self.writer.write_push(entry.kind.segment(), entry.index);
                self.compile_expression(index_expr)?;
                self.writer.write_arithmetic("add");
                self.compile_expression(expr)?;
                self.writer.write_pop("temp", 0);
                self.writer.write_pop("pointer", 1);
                self.writer.write_push("temp", 0);
                self.writer.write_pop("that", 0);
                Ok(())
            }
        }
    }

    fn compile_if(
        &mut self,
        cond: &Expression,
        then_branch: &[Statement],
        else_branch: Option<&[Statement]>,
    ) -> Result<(), JackError> {
        let n = self.next_label();
        let else_label = self.label_name("if_else", n);
        let end_label = self.label_name("end_if", n);

        self.compile_expression(cond)?;
        self.writer.write_arithmetic("not");
        self.writer.write_if_goto(&else_label);
        self.compile_statements(then_branch)?;
        self.writer.write_goto(&end_label);
        self.writer.write_label(&else_label);
        if let Some(else_branch) = else_branch {
            self.compile_statements(else_branch)?;
        }
        self.writer.write_label(&end_label);
        Ok(())
    }

    fn compile_while(&mut self, cond: &Expression, body: &[Statement]) -> Result<(), JackError> {
        let n = self.next_label();
        let while_label = self.label_name("while", n);
        let end_label = self.label_name("end_while", n);

        self.writer.write_label(&while_label);
        self.compile_expression(cond)?;
        self.writer.write_arithmetic("not");
        self.writer.write_if_goto(&end_label);
        self.compile_statements(body)?;
        self.writer.write_goto(&while_label);
        self.writer.write_label(&end_label);
        Ok(())
    }

    fn compile_return(&mut self, expr: Option<&Expression>) -> Result<(), JackError> {
        match expr {
            Some(expr) => self.compile_expression(expr)?,
            None => self.writer.write_push("constant", 0),
        }
        self.writer.write_return();
        Ok(())
    }

    /// Left-to-right, no precedence: `code(t0), code(t1), emit(op0), …` (§4.5, §9).
    fn compile_expression(&mut self, expr: &Expression) -> Result<(), JackError> {
        self.compile_term(&expr.first)?;
        for (op, term) in &expr.rest {
            self.compile_term(term)?;
            self.emit_binop(*op);
        }
        Ok(())
    }

    fn emit_binop(&mut self, op: BinOp) {
        match op {
            BinOp::Add => self.writer.write_arithmetic("add"),
            BinOp::Sub => self.writer.write_arithmetic("sub"),
            BinOp::And => self.writer.write_arithmetic("and"),
            BinOp::Or => self.writer.write_arithmetic("or"),
            BinOp::Lt => self.writer.write_arithmetic("lt"),
            BinOp::Gt => self.writer.write_arithmetic("gt"),
            BinOp::Eq => self.writer.write_arithmetic("eq"),
            BinOp::Mul => self.writer.write_call("Math.multiply", 2),
            BinOp::Div => self.writer.write_call("Math.divide", 2),
        }
    }

    fn compile_term(&mut self, term: &Term) -> Result<(), JackError> {
        match term {
            Term::IntConst(v) => {
                self.writer.write_push("constant", *v);
                Ok(())
            }
            Term::StringConst(s) => {
                self.writer.write_push("constant", s.chars().count() as u16);
                self.writer.write_call("String.new", 1);
                for c in s.chars() {
                    self.writer.write_push("constant", c as u16);
                    self.writer.write_call("String.appendChar", 2);
                }
                Ok(())
            }
            Term::KeywordConst(KeywordConstant::True) => {
                self.writer.write_push("constant", 1);
                self.writer.write_arithmetic("neg");
                Ok(())
            }
            Term::KeywordConst(KeywordConstant::False) | Term::KeywordConst(KeywordConstant::Null) => {
                self.writer.write_push("constant", 0);
                Ok(())
            }
            Term::KeywordConst(KeywordConstant::This) => {
                self.writer.write_push("pointer", 0);
                Ok(())
            }
            Term::VarRef(name) => {
                let entry = self.symtab.lookup(name)?.clone();
                self.writer.write_push(entry.kind.segment(), entry.index);
                Ok(())
            }
            Term::ArrayAt { var, index } => {
                let entry = self.symtab.lookup(var)?.clone();
                self.writer.write_push(entry.kind.segment(), entry.index);
                self.compile_expression(index)?;
                self.writer.write_arithmetic("add");
                self.writer.write_pop("pointer", 1);
                self.writer.write_push("that", 0);
                Ok(())
            }
            Term::Unary { op, term } => {
                self.compile_term(term)?;
                match op {
                    UnaryOp::Neg => self.writer.write_arithmetic("neg"),
                    UnaryOp::Not => self.writer.write_arithmetic("not"),
                }
                Ok(())
            }
            Term::Paren(expr) => self.compile_expression(expr),
            Term::Call(call) => self.compile_call(call),
        }
    }

    /// Subroutine call lowering (§4.5): three cases depending on whether
    /// `parent` names a known symbol, a class, or is absent.
    fn compile_call(&mut self, call: &Call) -> Result<(), JackError> {
        let (target, n_implicit_args) = match &call.parent {
            Some(parent) if self.symtab.contains(parent) => {
                let entry = self.symtab.lookup(parent)?.clone();
                let object_type = match &entry.var_type {
                    Type::Class(name) => name.clone(),
                    primitive => {
                        return Err(JackError::new(
                            ErrorKind::UndefinedVariableError,
                            format!(
                                "called a method of a primitive type {}",
                                primitive_type_name(primitive)
                            ),
                            Span::new(1, 1),
                        ))
                    }
                };
                self.writer.write_push(entry.kind.segment(), entry.index);
                (format!("{object_type}.{}", call.name), 1)
            }
            Some(parent) => (format!("{parent}.{}", call.name), 0),
            None => {
                self.writer.write_push("pointer", 0);
                (format!("{}.{}", self.class_name, call.name), 1)
            }
        };

        for arg in &call.args {
            self.compile_expression(arg)?;
        }

        let n_args_sent = n_implicit_args + call.args.len() as u16;
        self.writer.write_call(&target, n_args_sent);
        Ok(())
    }

    fn next_label(&mut self) -> u32 {
        let n = self.label_counter;
        self.label_counter += 1;
        n
    }

    fn label_name(&self, kind: &str, n: u32) -> String {
        format!(
            "{}.{}${}_{}",
            self.class_name, self.subroutine_name, kind, n
        )
    }
}

fn primitive_type_name(t: &Type) -> &'static str {
    match t {
        Type::Int => "int",
        Type::Char => "char",
        Type::Boolean => "boolean",
        Type::Class(_) => unreachable!("callers only pass primitive types"),
    }
}
