//! Top-level declaration splitting and classification.

use smallvec::SmallVec;
use tracing::trace;

use skein_ir::{CollisionKey, DeclKind, Declaration, ImportSpec, ModulePath};

use crate::error::CompileError;
use crate::scan::{tokenize, TokKind, Token};

/// Validate a rendered fragment and extract its declarations.
///
/// The fragment must consist solely of top-level declarations: import
/// directives, type definitions, constants, variables, and functions or
/// methods. A parse failure rejects the whole fragment (the error carries
/// the text verbatim) and admits nothing.
pub fn parse_fragment(text: &str) -> Result<Vec<Declaration>, CompileError> {
    let tokens = tokenize(text).map_err(|e| CompileError::Syntax {
        offset: e.offset,
        message: e.message,
        fragment: text.to_string(),
    })?;
    Parser {
        src: text,
        tokens,
        pos: 0,
    }
    .parse_all()
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn parse_all(mut self) -> Result<Vec<Declaration>, CompileError> {
        let mut decls = Vec::new();
        while let Some((text_start, kw)) = self.next_decl_start() {
            match kw.kind {
                TokKind::Ident => match self.text(kw) {
                    "import" => {
                        self.bump();
                        decls.push(self.parse_import(text_start)?);
                    }
                    "type" => {
                        self.bump();
                        self.parse_type(text_start, &mut decls)?;
                    }
                    "const" => {
                        self.bump();
                        decls.push(self.parse_const_var(DeclKind::Const, text_start)?);
                    }
                    "var" => {
                        self.bump();
                        decls.push(self.parse_const_var(DeclKind::Var, text_start)?);
                    }
                    "func" => {
                        self.bump();
                        decls.push(self.parse_func(text_start)?);
                    }
                    construct => {
                        return Err(self.unsupported(construct, kw.start));
                    }
                },
                _ => {
                    return Err(self.syntax(kw.start, "expected a top-level declaration"));
                }
            }
        }
        trace!(count = decls.len(), "parsed fragment");
        Ok(decls)
    }

    /// Skip separators up to the next declaration, tracking the start of a
    /// contiguous leading comment block so documentation attaches to the
    /// declaration that follows it. A blank line detaches comments.
    fn next_decl_start(&mut self) -> Option<(usize, Token)> {
        let mut pending: Option<usize> = None;
        let mut newline_run = 0u32;
        loop {
            let tok = self.current();
            match tok.kind {
                TokKind::Eof => return None,
                TokKind::Newline => {
                    newline_run += 1;
                    if newline_run >= 2 {
                        pending = None;
                    }
                    self.bump();
                }
                TokKind::Semi => self.bump(),
                k if k.is_comment() => {
                    if pending.is_none() {
                        pending = Some(tok.start);
                    }
                    newline_run = 0;
                    self.bump();
                }
                _ => return Some((pending.unwrap_or(tok.start), tok)),
            }
        }
    }

    fn parse_import(&mut self, text_start: usize) -> Result<Declaration, CompileError> {
        self.skip_comments();
        let mut specs = Vec::new();
        let tok = self.current();
        match tok.kind {
            TokKind::Str | TokKind::RawStr | TokKind::Ident | TokKind::Dot => {
                specs.push(self.parse_import_spec()?);
            }
            TokKind::LParen => {
                self.bump();
                loop {
                    self.skip_separators();
                    if self.current().kind == TokKind::RParen {
                        self.bump();
                        break;
                    }
                    if self.current().kind == TokKind::Eof {
                        return Err(self.syntax(tok.start, "unterminated import group"));
                    }
                    specs.push(self.parse_import_spec()?);
                }
            }
            _ => return Err(self.syntax(tok.start, "malformed import declaration")),
        }
        let text = self.slice(text_start, self.prev_end());
        Ok(Declaration::import(specs, text))
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, CompileError> {
        let tok = self.current();
        let alias = match tok.kind {
            TokKind::Ident => {
                self.bump();
                Some(self.text(tok).to_string())
            }
            TokKind::Dot => {
                self.bump();
                Some(".".to_string())
            }
            _ => None,
        };
        self.skip_comments();
        let path_tok = self.current();
        if !matches!(path_tok.kind, TokKind::Str | TokKind::RawStr) {
            return Err(self.syntax(path_tok.start, "expected import path string"));
        }
        self.bump();
        let quoted = self.text(path_tok);
        let path = &quoted[1..quoted.len() - 1];
        Ok(ImportSpec {
            path: ModulePath::new(path),
            alias,
        })
    }

    fn parse_type(
        &mut self,
        text_start: usize,
        decls: &mut Vec<Declaration>,
    ) -> Result<(), CompileError> {
        self.skip_comments();
        if self.current().kind == TokKind::LParen {
            let open = self.current();
            self.bump();
            loop {
                self.skip_separators();
                let tok = self.current();
                match tok.kind {
                    TokKind::RParen => {
                        self.bump();
                        return Ok(());
                    }
                    TokKind::Eof => {
                        return Err(self.syntax(open.start, "unterminated type group"));
                    }
                    TokKind::Ident => {
                        let name = self.text(tok).to_string();
                        self.bump();
                        let end = self.consume_body(true)?;
                        // Each grouped spec becomes its own standalone
                        // declaration, so the slice is re-prefixed.
                        let text = format!("type {}", self.slice(tok.start, end));
                        decls.push(Declaration::named(
                            DeclKind::Type,
                            plain_keys(&name),
                            text,
                        ));
                    }
                    _ => return Err(self.syntax(tok.start, "expected type name")),
                }
            }
        }

        let tok = self.current();
        if tok.kind != TokKind::Ident {
            return Err(self.syntax(tok.start, "expected type name"));
        }
        let name = self.text(tok).to_string();
        self.bump();
        let end = self.consume_body(false)?;
        decls.push(Declaration::named(
            DeclKind::Type,
            plain_keys(&name),
            self.slice(text_start, end),
        ));
        Ok(())
    }

    fn parse_const_var(
        &mut self,
        kind: DeclKind,
        text_start: usize,
    ) -> Result<Declaration, CompileError> {
        self.skip_comments();
        let mut keys: SmallVec<[CollisionKey; 1]> = SmallVec::new();

        if self.current().kind == TokKind::LParen {
            let open = self.current();
            self.bump();
            loop {
                self.skip_separators();
                let tok = self.current();
                match tok.kind {
                    TokKind::RParen => {
                        self.bump();
                        break;
                    }
                    TokKind::Eof => {
                        return Err(self.syntax(open.start, "unterminated declaration group"));
                    }
                    TokKind::Ident => {
                        self.parse_name_list(&mut keys)?;
                        let _ = self.consume_body(true)?;
                    }
                    _ => return Err(self.syntax(tok.start, "expected declaration name")),
                }
            }
            let text = self.slice(text_start, self.prev_end());
            return Ok(Declaration::named(kind, keys, text));
        }

        if self.current().kind != TokKind::Ident {
            return Err(self.syntax(self.current().start, "expected declaration name"));
        }
        self.parse_name_list(&mut keys)?;
        let end = self.consume_body(false)?;
        Ok(Declaration::named(kind, keys, self.slice(text_start, end)))
    }

    /// `a` or `a, b, c`: the names of one const/var spec. Blank identifiers
    /// declare nothing and produce no key.
    fn parse_name_list(
        &mut self,
        keys: &mut SmallVec<[CollisionKey; 1]>,
    ) -> Result<(), CompileError> {
        loop {
            let tok = self.current();
            if tok.kind != TokKind::Ident {
                return Err(self.syntax(tok.start, "expected declaration name"));
            }
            let name = self.text(tok);
            if name != "_" {
                keys.push(CollisionKey::plain(name));
            }
            self.bump();
            if self.current().kind == TokKind::Comma {
                self.bump();
                self.skip_comments();
            } else {
                return Ok(());
            }
        }
    }

    fn parse_func(&mut self, text_start: usize) -> Result<Declaration, CompileError> {
        self.skip_comments();
        let mut receiver: Option<String> = None;

        if self.current().kind == TokKind::LParen {
            let open = self.current();
            self.bump();
            receiver = Some(self.parse_receiver(open)?);
        }

        self.skip_comments();
        let tok = self.current();
        if tok.kind != TokKind::Ident {
            return Err(self.syntax(tok.start, "expected function name"));
        }
        let name = self.text(tok).to_string();
        self.bump();
        let end = self.consume_body(false)?;
        let text = self.slice(text_start, end);

        let decl = match receiver {
            Some(recv) => {
                let keys = if name == "_" {
                    SmallVec::new()
                } else {
                    let mut k: SmallVec<[CollisionKey; 1]> = SmallVec::new();
                    k.push(CollisionKey::method(recv, &name));
                    k
                };
                Declaration::named(DeclKind::Method, keys, text)
            }
            None => Declaration::named(DeclKind::Func, plain_keys(&name), text),
        };
        trace!(name = %name, kind = ?decl.kind, "parsed declaration");
        Ok(decl)
    }

    /// Extract the receiver base type from `(r *Color[T])`: the last
    /// identifier at receiver depth outside type-parameter brackets.
    fn parse_receiver(&mut self, open: Token) -> Result<String, CompileError> {
        let mut depth = 1i32;
        let mut brack = 0i32;
        let mut base: Option<String> = None;
        loop {
            let tok = self.current();
            match tok.kind {
                TokKind::Eof => {
                    return Err(self.syntax(open.start, "unterminated method receiver"));
                }
                TokKind::LParen => {
                    depth += 1;
                    self.bump();
                }
                TokKind::RParen => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        break;
                    }
                }
                TokKind::LBrack => {
                    brack += 1;
                    self.bump();
                }
                TokKind::RBrack => {
                    brack -= 1;
                    self.bump();
                }
                TokKind::Ident if depth == 1 && brack == 0 => {
                    base = Some(self.text(tok).to_string());
                    self.bump();
                }
                _ => self.bump(),
            }
        }
        base.ok_or_else(|| self.syntax(open.start, "missing receiver type"))
    }

    /// Consume tokens to the end of the current declaration.
    ///
    /// A declaration ends at a newline when all bracket depths are zero
    /// and the last significant token can terminate a declaration (the
    /// target language's terminator-insertion rule), at a `;` at depth
    /// zero, or at end of input. In group mode a `)` at depth zero ends
    /// the spec without being consumed.
    ///
    /// Returns the end offset of the last significant token.
    fn consume_body(&mut self, in_group: bool) -> Result<usize, CompileError> {
        let mut paren = 0i32;
        let mut brace = 0i32;
        let mut brack = 0i32;
        // The token consumed just before this call (a name, usually) seeds
        // the terminator check so bare group specs like `B` end at once.
        let mut last = self.tokens[self.pos.saturating_sub(1)];
        let mut end = last.end;
        loop {
            let tok = self.current();
            let balanced = paren == 0 && brace == 0 && brack == 0;
            match tok.kind {
                TokKind::Eof => {
                    if balanced {
                        return Ok(end);
                    }
                    return Err(self.syntax(tok.start, "unexpected end of fragment"));
                }
                TokKind::Newline => {
                    if balanced && last.kind.terminates_decl() {
                        return Ok(end);
                    }
                    self.bump();
                }
                TokKind::Semi if balanced => {
                    self.bump();
                    return Ok(end);
                }
                TokKind::RParen if in_group && paren == 0 => {
                    return Ok(end);
                }
                k if k.is_comment() => self.bump(),
                _ => {
                    match tok.kind {
                        TokKind::LParen => paren += 1,
                        TokKind::RParen => paren -= 1,
                        TokKind::LBrace => brace += 1,
                        TokKind::RBrace => brace -= 1,
                        TokKind::LBrack => brack += 1,
                        TokKind::RBrack => brack -= 1,
                        _ => {}
                    }
                    if paren < 0 || brace < 0 || brack < 0 {
                        return Err(self.syntax(tok.start, "unbalanced closing bracket"));
                    }
                    last = tok;
                    end = tok.end;
                    self.bump();
                }
            }
        }
    }

    fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn prev_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].end
    }

    fn text(&self, tok: Token) -> &str {
        &self.src[tok.start..tok.end]
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.src[start..end].trim_end().to_string()
    }

    fn skip_comments(&mut self) {
        while self.current().kind.is_comment() {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.current().kind, TokKind::Newline | TokKind::Semi)
            || self.current().kind.is_comment()
        {
            self.bump();
        }
    }

    fn syntax(&self, offset: usize, message: &str) -> CompileError {
        CompileError::Syntax {
            offset,
            message: message.to_string(),
            fragment: self.src.to_string(),
        }
    }

    fn unsupported(&self, construct: &str, offset: usize) -> CompileError {
        CompileError::Unsupported {
            construct: construct.to_string(),
            offset,
            fragment: self.src.to_string(),
        }
    }
}

fn plain_keys(name: &str) -> SmallVec<[CollisionKey; 1]> {
    let mut keys = SmallVec::new();
    if name != "_" {
        keys.push(CollisionKey::plain(name));
    }
    keys
}

#[cfg(test)]
mod tests;
