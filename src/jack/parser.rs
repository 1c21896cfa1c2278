//! # Parser (C2)
//!
//! Recursive descent over the token stream into the AST in [`crate::jack::ast`].
//! Each `compile_*` method corresponds to one grammar nonterminal and is
//! kept independently callable (and independently testable) against a
//! partial token stream, per §4.2.

#[cfg(test)]
mod tests;

use crate::jack::ast::*;
use crate::jack::error::{ErrorKind, JackError, Span};
use crate::jack::lexer::Tokenizer;
use crate::jack::token::{Keyword, KeywordConstant as TokKeywordConstant, Token, TokenKind};

pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Result<Self, JackError> {
        Ok(Self {
            tokenizer: Tokenizer::new(source)?,
        })
    }

    fn span(&self) -> Span {
        Span::new(self.tokenizer.current_line(), 1)
    }

    fn current(&self) -> Result<&Token, JackError> {
        self.tokenizer.current().ok_or_else(|| {
            JackError::new(
                ErrorKind::IncompleteCommandError,
                "unexpected end of input",
                self.span(),
            )
        })
    }

    fn advance(&mut self) -> Result<(), JackError> {
        self.tokenizer.advance()
    }

    fn has_more(&self) -> bool {
        self.tokenizer.has_more()
    }

    fn structure_error(&self, message: impl Into<String>) -> JackError {
        JackError::new(ErrorKind::StructureError, message, self.span())
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), JackError> {
        match &self.current()?.kind {
            TokenKind::Symbol(c) if *c == symbol => {
                self.advance()?;
                Ok(())
            }
            other => Err(self.structure_error(format!("expected '{symbol}', found {other:?}"))),
        }
    }

    fn peek_symbol(&self, symbol: char) -> bool {
        matches!(self.tokenizer.current(), Some(Token { kind: TokenKind::Symbol(c), .. }) if *c == symbol)
    }

    fn peek_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.tokenizer.current(), Some(Token { kind: TokenKind::Keyword(k), .. }) if *k == keyword)
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), JackError> {
        match &self.current()?.kind {
            TokenKind::Keyword(k) if *k == keyword => {
                self.advance()?;
                Ok(())
            }
            other => Err(self.structure_error(format!("expected '{keyword:?}', found {other:?}"))),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, JackError> {
        match self.current()?.kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => Err(self.structure_error(format!("expected identifier, found {other:?}"))),
        }
    }

    /// `class ::= 'class' Id '{' classVar* subroutine* '}'`
    pub fn parse_class(&mut self) -> Result<Class, JackError> {
        self.expect_keyword(Keyword::Class)?;
        let name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        let mut class_vars = Vec::new();
        while self.has_more() && (self.peek_keyword(Keyword::Static) || self.peek_keyword(Keyword::Field)) {
            class_vars.push(self.compile_class_var_dec()?);
        }

        let mut subroutines = Vec::new();
        while self.has_more()
            && (self.peek_keyword(Keyword::Constructor)
                || self.peek_keyword(Keyword::Function)
                || self.peek_keyword(Keyword::Method))
        {
            subroutines.push(self.compile_subroutine_dec()?);
        }

        self.expect_symbol('}')?;

        Ok(Class {
            name,
            class_vars,
            subroutines,
        })
    }

    fn parse_type(&mut self) -> Result<Type, JackError> {
        match self.current()?.kind.clone() {
            TokenKind::Keyword(Keyword::Int) => {
                self.advance()?;
                Ok(Type::Int)
            }
            TokenKind::Keyword(Keyword::Char) => {
                self.advance()?;
                Ok(Type::Char)
            }
            TokenKind::Keyword(Keyword::Boolean) => {
                self.advance()?;
                Ok(Type::Boolean)
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                Ok(Type::Class(name))
            }
            other => Err(self.structure_error(format!("expected a type, found {other:?}"))),
        }
    }

    /// `classVar ::= ('static'|'field') type name (',' name)* ';'`
    pub fn compile_class_var_dec(&mut self) -> Result<ClassVar, JackError> {
        let kind = match self.current()?.kind {
            TokenKind::Keyword(Keyword::Static) => ClassVarKind::Static,
            TokenKind::Keyword(Keyword::Field) => ClassVarKind::Field,
            ref other => {
                return Err(self.structure_error(format!("expected 'static' or 'field', found {other:?}")))
            }
        };
        self.advance()?;
        let var_type = self.parse_type()?;
        let names = self.compile_name_list()?;
        self.expect_symbol(';')?;
        Ok(ClassVar {
            kind,
            var_type,
            names,
        })
    }

    fn compile_name_list(&mut self) -> Result<Vec<String>, JackError> {
        let mut names = vec![self.expect_identifier()?];
        while self.has_more() && self.peek_symbol(',') {
            self.advance()?;
            names.push(self.expect_identifier()?);
        }
        Ok(names)
    }

    /// `subroutine ::= ('constructor'|'function'|'method') (type|'void') Id '(' params? ')' body`
    pub fn compile_subroutine_dec(&mut self) -> Result<Subroutine, JackError> {
        let kind = match self.current()?.kind {
            TokenKind::Keyword(Keyword::Constructor) => SubroutineKind::Constructor,
            TokenKind::Keyword(Keyword::Function) => SubroutineKind::Function,
            TokenKind::Keyword(Keyword::Method) => SubroutineKind::Method,
            ref other => {
                return Err(self.structure_error(format!(
                    "expected 'constructor', 'function', or 'method', found {other:?}"
                )))
            }
        };
        self.advance()?;

        let return_type = if self.peek_keyword(Keyword::Void) {
            self.advance()?;
            ReturnType::Void
        } else {
            ReturnType::Type(self.parse_type()?)
        };

        let name = self.expect_identifier()?;
        self.expect_symbol('(')?;
        let params = self.compile_param_list()?;
        self.expect_symbol(')')?;
        let body = self.compile_subroutine_body()?;

        Ok(Subroutine {
            kind,
            return_type,
            name,
            params,
            body,
        })
    }

    fn compile_param_list(&mut self) -> Result<Vec<Param>, JackError> {
        let mut params = Vec::new();
        if self.peek_symbol(')') {
            return Ok(params);
        }
        loop {
            let param_type = self.parse_type()?;
            let name = self.expect_identifier()?;
            params.push(Param { param_type, name });
            if self.has_more() && self.peek_symbol(',') {
                self.advance()?;
                continue;
            }
            break;
        }
        Ok(params)
    }

    fn compile_subroutine_body(&mut self) -> Result<Body, JackError> {
        self.expect_symbol('{')?;
        let locals = self.compile_var_dec_list()?;
        let statements = self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(Body { locals, statements })
    }

    /// Zero or more `var ::= 'var' type name (',' name)* ';'` declarations.
    pub fn compile_var_dec_list(&mut self) -> Result<Vec<LocalDec>, JackError> {
        let mut locals = Vec::new();
        while self.has_more() && self.peek_keyword(Keyword::Var) {
            self.advance()?;
            let var_type = self.parse_type()?;
            let names = self.compile_name_list()?;
            self.expect_symbol(';')?;
            locals.push(LocalDec { var_type, names });
        }
        Ok(locals)
    }

    /// Zero or more statements, stopping at the first token that can't
    /// start a statement (normally `}`).
    pub fn compile_statements(&mut self) -> Result<Vec<Statement>, JackError> {
        let mut statements = Vec::new();
        while self.has_more() && self.starts_statement() {
            statements.push(self.compile_statement()?);
        }
        Ok(statements)
    }

    fn starts_statement(&self) -> bool {
        self.peek_keyword(Keyword::Let)
            || self.peek_keyword(Keyword::If)
            || self.peek_keyword(Keyword::While)
            || self.peek_keyword(Keyword::Do)
            || self.peek_keyword(Keyword::Return)
    }

    fn compile_statement(&mut self) -> Result<Statement, JackError> {
        match self.current()?.kind {
            TokenKind::Keyword(Keyword::Let) => self.compile_let(),
            TokenKind::Keyword(Keyword::If) => self.compile_if(),
            TokenKind::Keyword(Keyword::While) => self.compile_while(),
            TokenKind::Keyword(Keyword::Do) => self.compile_do(),
            TokenKind::Keyword(Keyword::Return) => self.compile_return(),
            ref other => Err(self.structure_error(format!("expected a statement, found {other:?}"))),
        }
    }

    /// `'let' Id ('[' expr ']')? '=' expr ';'`
    pub fn compile_let(&mut self) -> Result<Statement, JackError> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;
        let index = if self.has_more() && self.peek_symbol('[') {
            self.advance()?;
            let idx = self.compile_expression()?;
            self.expect_symbol(']')?;
            Some(idx)
        } else {
            None
        };
        self.expect_symbol('=')?;
        let expr = self.compile_expression()?;
        self.expect_symbol(';')?;
        Ok(Statement::Let { name, index, expr })
    }

    /// `'if' '(' expr ')' '{' statements '}' ('else' '{' statements '}')?`
    fn compile_if(&mut self) -> Result<Statement, JackError> {
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol('(')?;
        let cond = self.compile_expression()?;
        self.expect_symbol(')')?;
        self.expect_symbol('{')?;
        let then_branch = self.compile_statements()?;
        self.expect_symbol('}')?;

        let else_branch = if self.has_more() && self.peek_keyword(Keyword::Else) {
            self.advance()?;
            self.expect_symbol('{')?;
            let stmts = self.compile_statements()?;
            self.expect_symbol('}')?;
            Some(stmts)
        } else {
            None
        };

        Ok(Statement::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// `'while' '(' expr ')' '{' statements '}'`
    fn compile_while(&mut self) -> Result<Statement, JackError> {
        self.expect_keyword(Keyword::While)?;
        self.expect_symbol('(')?;
        let cond = self.compile_expression()?;
        self.expect_symbol(')')?;
        self.expect_symbol('{')?;
        let body = self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(Statement::While { cond, body })
    }

    /// `'do' subroutineCall ';'`
    fn compile_do(&mut self) -> Result<Statement, JackError> {
        self.expect_keyword(Keyword::Do)?;
        let name_or_parent = self.expect_identifier()?;
        let call = self.compile_call_tail(name_or_parent)?;
        self.expect_symbol(';')?;
        Ok(Statement::Do { call })
    }

    /// `'return' expr? ';'`
    fn compile_return(&mut self) -> Result<Statement, JackError> {
        self.expect_keyword(Keyword::Return)?;
        let expr = if self.has_more() && self.peek_symbol(';') {
            None
        } else {
            Some(self.compile_expression()?)
        };
        self.expect_symbol(';')?;
        Ok(Statement::Return { expr })
    }

    fn binop(&self, c: char) -> Option<BinOp> {
        Some(match c {
            '+' => BinOp::Add,
            '-' => BinOp::Sub,
            '*' => BinOp::Mul,
            '/' => BinOp::Div,
            '&' => BinOp::And,
            '|' => BinOp::Or,
            '<' => BinOp::Lt,
            '>' => BinOp::Gt,
            '=' => BinOp::Eq,
            _ => return None,
        })
    }

    /// `expression ::= term (op term)*` — flat, no precedence (§4.2, §9).
    pub fn compile_expression(&mut self) -> Result<Expression, JackError> {
        let first = Box::new(self.compile_term()?);
        let mut rest = Vec::new();
        while self.has_more() {
            let op = match self.tokenizer.current() {
                Some(Token {
                    kind: TokenKind::Symbol(c),
                    ..
                }) => self.binop(*c),
                _ => None,
            };
            let Some(op) = op else { break };
            self.advance()?;
            let term = self.compile_term()?;
            rest.push((op, term));
        }
        Ok(Expression { first, rest })
    }

    /// `term` — disambiguated per §4.2 on an identifier's lookahead token.
    fn compile_term(&mut self) -> Result<Term, JackError> {
        match self.current()?.kind.clone() {
            TokenKind::IntegerConstant(v) => {
                self.advance()?;
                Ok(Term::IntConst(v))
            }
            TokenKind::StringConstant(s) => {
                self.advance()?;
                Ok(Term::StringConst(s))
            }
            TokenKind::KeywordConstant(k) => {
                self.advance()?;
                let kc = match k {
                    TokKeywordConstant::True => KeywordConstant::True,
                    TokKeywordConstant::False => KeywordConstant::False,
                    TokKeywordConstant::Null => KeywordConstant::Null,
                    TokKeywordConstant::This => KeywordConstant::This,
                };
                Ok(Term::KeywordConst(kc))
            }
            TokenKind::Symbol('-') => {
                self.advance()?;
                Ok(Term::Unary {
                    op: UnaryOp::Neg,
                    term: Box::new(self.compile_term()?),
                })
            }
            TokenKind::Symbol('~') => {
                self.advance()?;
                Ok(Term::Unary {
                    op: UnaryOp::Not,
                    term: Box::new(self.compile_term()?),
                })
            }
            TokenKind::Symbol('(') => {
                self.advance()?;
                let expr = self.compile_expression()?;
                self.expect_symbol(')')?;
                Ok(Term::Paren(Box::new(expr)))
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                if self.has_more() && self.peek_symbol('[') {
                    self.advance()?;
                    let index = self.compile_expression()?;
                    self.expect_symbol(']')?;
                    Ok(Term::ArrayAt {
                        var: name,
                        index: Box::new(index),
                    })
                } else if self.has_more() && (self.peek_symbol('(') || self.peek_symbol('.')) {
                    Ok(Term::Call(self.compile_call_tail(name)?))
                } else {
                    Ok(Term::VarRef(name))
                }
            }
            other => Err(self.structure_error(format!("expected a term, found {other:?}"))),
        }
    }

    /// Given the leading identifier already consumed, parse the remainder
    /// of a subroutine call: either `(args)` or `.name(args)`.
    fn compile_call_tail(&mut self, first_name: String) -> Result<Call, JackError> {
        if self.peek_symbol('(') {
            self.advance()?;
            let args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            Ok(Call {
                parent: None,
                name: first_name,
                args,
            })
        } else {
            self.expect_symbol('.')?;
            let name = self.expect_identifier()?;
            self.expect_symbol('(')?;
            let args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            Ok(Call {
                parent: Some(first_name),
                name,
                args,
            })
        }
    }

    fn compile_expression_list(&mut self) -> Result<Vec<Expression>, JackError> {
        let mut args = Vec::new();
        if self.peek_symbol(')') {
            return Ok(args);
        }
        loop {
            args.push(self.compile_expression()?);
            if self.has_more() && self.peek_symbol(',') {
                self.advance()?;
                continue;
            }
            break;
        }
        Ok(args)
    }
}
