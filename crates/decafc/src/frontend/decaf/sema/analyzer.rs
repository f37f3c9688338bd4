//! Semantic analyzer - scope building and type checking

use crate::common::Span;
use crate::frontend::decaf::ast::*;
use super::diagnostic::{Diagnostic, DiagnosticKind, MismatchKind};
use super::scope::{ScopeTable, Symbol, SymbolKind};
use super::types::Type;

/// Which operand rules the type checker enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSet {
    /// Decaf typing rules
    #[default]
    Standard,
    /// Reproduces the diagnostics of the Decaf course checker, including
    /// its inverted `+ - < <= > >= && || == !=` checks and int-only assignment
    Legacy,
}

/// Configuration for one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub rules: RuleSet,
}

/// Semantic analyzer for Decaf programs
///
/// All state is reset at the start of [`analyze`](Self::analyze), so one
/// instance can check any number of programs.
pub struct Analyzer {
    config: AnalyzerConfig,
    scopes: ScopeTable,
    diagnostics: Vec<Diagnostic>,
    found_main: bool,
    loop_depth: usize,
    current_method: Option<(String, Type)>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            scopes: ScopeTable::new(),
            diagnostics: Vec::new(),
            found_main: false,
            loop_depth: 0,
            current_method: None,
        }
    }

    /// Walk a program and return every diagnostic in discovery order
    pub fn analyze(&mut self, program: &Program) -> Vec<Diagnostic> {
        self.scopes = ScopeTable::new();
        self.diagnostics.clear();
        self.found_main = false;
        self.loop_depth = 0;
        self.current_method = None;

        log::debug!(
            "analyzing class {} ({} fields, {} methods, {:?} rules)",
            program.name,
            program.fields.len(),
            program.methods.len(),
            self.config.rules
        );

        for field in &program.fields {
            self.analyze_field_decl(field);
        }
        for method in &program.methods {
            self.analyze_method_decl(method);
        }

        if !self.found_main {
            self.report(Diagnostic::at_line(DiagnosticKind::MissingMainMethod, program.end_line));
        }

        log::debug!("analysis finished with {} diagnostics", self.diagnostics.len());
        std::mem::take(&mut self.diagnostics)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn declare(&mut self, symbol: Symbol, line: usize) {
        if let Err(dup) = self.scopes.declare(symbol) {
            let span = Span::new(dup.rejected.span.start, dup.rejected.span.end, line);
            self.report(Diagnostic::new(
                DiagnosticKind::DuplicateDeclaration {
                    name: dup.rejected.name,
                    ty: dup.rejected.ty,
                },
                span,
            ));
        }
    }

    fn legacy(&self) -> bool {
        self.config.rules == RuleSet::Legacy
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn analyze_field_decl(&mut self, field: &FieldDecl) {
        let line = field.span.line;
        for decl in &field.names {
            let ty = match &decl.array_size {
                None => Type::from(field.ty),
                Some(size) => {
                    let len = parse_array_size(size);
                    if len.is_none() {
                        self.report(Diagnostic::new(
                            DiagnosticKind::InvalidArraySize {
                                name: decl.name.clone(),
                                size: size.clone(),
                            },
                            Span::new(decl.span.start, decl.span.end, line),
                        ));
                    }
                    Type::array(field.ty, len.unwrap_or(0))
                }
            };
            self.declare(Symbol::new(&decl.name, SymbolKind::Field, ty, decl.span), line);
        }
    }

    fn analyze_var_decl(&mut self, var: &VarDecl) {
        for (name, span) in &var.names {
            let symbol = Symbol::new(name, SymbolKind::Local, Type::from(var.ty), *span);
            self.declare(symbol, var.span.line);
        }
    }

    fn analyze_method_decl(&mut self, method: &MethodDecl) {
        let return_type = Type::from(method.return_type);
        let symbol = Symbol::new(
            &method.name,
            SymbolKind::Method {
                params: method.params.iter().map(|p| p.ty).collect(),
            },
            return_type,
            method.span,
        );
        self.declare(symbol, method.span.line);

        if method.name == "main" {
            self.found_main = true;
        }

        // Parameters and the body's top-level locals share one scope
        self.scopes.enter_scope();
        for param in &method.params {
            let symbol = Symbol::new(&param.name, SymbolKind::Parameter, Type::from(param.ty), param.span);
            self.declare(symbol, param.span.line);
        }

        self.current_method = Some((method.name.clone(), return_type));
        self.analyze_block_contents(&method.body);
        self.current_method = None;

        self.scopes.exit_scope();
    }

    /// Declarations and statements of a block, in the current scope
    fn analyze_block_contents(&mut self, block: &Block) {
        for var in &block.var_decls {
            self.analyze_var_decl(var);
        }
        for stmt in &block.statements {
            self.analyze_stmt(stmt);
        }
    }

    fn analyze_nested_block(&mut self, block: &Block) {
        self.scopes.enter_scope();
        self.analyze_block_contents(block);
        self.scopes.exit_scope();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        let line = stmt.span.line;
        match &stmt.kind {
            StmtKind::Assign { target, op, value } => {
                let target_ty = self.type_of_location(target, line, true);
                let value_ty = self.type_of(value);
                if !self.assignment_ok(*op, target_ty, value_ty) {
                    self.report(Diagnostic::new(
                        DiagnosticKind::TypeMismatch {
                            kind: MismatchKind::Assignment,
                            left: target_ty.to_string(),
                            right: value_ty.to_string(),
                        },
                        stmt.span,
                    ));
                }
            }
            StmtKind::MethodCall(call) => {
                self.type_of_call(call);
            }
            StmtKind::If { condition, then_block, else_block } => {
                self.check_condition(condition);
                self.analyze_nested_block(then_block);
                if let Some(else_block) = else_block {
                    self.analyze_nested_block(else_block);
                }
            }
            StmtKind::For { var, var_span, start, end, body } => {
                match self.scopes.resolve(var).cloned() {
                    None => self.report(Diagnostic::new(
                        DiagnosticKind::UndeclaredVariable { name: var.clone(), target: false },
                        *var_span,
                    )),
                    Some(sym) if sym.is_method() => self.report(Diagnostic::new(
                        DiagnosticKind::NotAVariable { name: var.clone() },
                        *var_span,
                    )),
                    Some(sym) if !sym.ty.is_int() => self.report(Diagnostic::new(
                        DiagnosticKind::TypeMismatch {
                            kind: MismatchKind::LoopVariable,
                            left: var.clone(),
                            right: sym.ty.to_string(),
                        },
                        *var_span,
                    )),
                    Some(_) => {}
                }
                for bound in [start, end] {
                    let ty = self.type_of(bound);
                    if !ty.is_int() && !ty.is_unknown() {
                        self.report(Diagnostic::new(
                            DiagnosticKind::TypeMismatch {
                                kind: MismatchKind::LoopBound,
                                left: bound.to_string(),
                                right: ty.to_string(),
                            },
                            bound.span,
                        ));
                    }
                }

                self.loop_depth += 1;
                self.analyze_nested_block(body);
                self.loop_depth -= 1;
            }
            StmtKind::Return(value) => self.check_return(value.as_ref(), stmt.span),
            StmtKind::Break | StmtKind::Continue => {
                if self.loop_depth == 0 {
                    let keyword = if matches!(stmt.kind, StmtKind::Break) { "break" } else { "continue" };
                    self.report(Diagnostic::new(DiagnosticKind::InvalidControlFlow { keyword }, stmt.span));
                }
            }
            StmtKind::Block(block) => self.analyze_nested_block(block),
        }
    }

    fn assignment_ok(&self, op: AssignOp, target: Type, value: Type) -> bool {
        // An unresolved target was already reported
        if target.is_unknown() {
            return true;
        }
        if self.legacy() {
            return target.is_int() && value.is_int();
        }
        if value.is_unknown() {
            return true;
        }
        match op {
            AssignOp::Assign => target.is_scalar() && target == value,
            AssignOp::AddAssign | AssignOp::SubAssign => target.is_int() && value.is_int(),
        }
    }

    fn check_condition(&mut self, condition: &Expr) {
        let ty = self.type_of(condition);
        if !ty.is_boolean() && !ty.is_unknown() {
            self.report(Diagnostic::new(
                DiagnosticKind::TypeMismatch {
                    kind: MismatchKind::Condition,
                    left: ty.to_string(),
                    right: Type::Boolean.to_string(),
                },
                condition.span,
            ));
        }
    }

    fn check_return(&mut self, value: Option<&Expr>, span: Span) {
        let found = value.map_or(Type::Void, |e| self.type_of(e));
        let Some((method, expected)) = self.current_method.clone() else {
            return;
        };
        if found != expected && !found.is_unknown() {
            self.report(Diagnostic::new(
                DiagnosticKind::ReturnMismatch { method, expected, found },
                span,
            ));
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Static type of an expression; never fails, `Unknown` stands in for
    /// anything unresolved
    pub fn type_of(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::Location(loc) => self.type_of_location(loc, expr.span.line, false),
            ExprKind::Literal(lit) => self.type_of_literal(lit),
            ExprKind::MethodCall(call) => self.type_of_call(call),
            ExprKind::Unary { op, operand } => {
                // Operand is typed for its own diagnostics only
                self.type_of(operand);
                match op {
                    UnaryOp::Not => Type::Boolean,
                    UnaryOp::Neg => Type::Int,
                }
            }
            ExprKind::Paren(inner) => self.type_of(inner),
            ExprKind::Binary { op, left, right } => {
                let left_ty = self.type_of(left);
                let right_ty = self.type_of(right);
                let category = op.category();

                if !self.operands_ok(category, left_ty, right_ty) {
                    self.report(Diagnostic::new(
                        DiagnosticKind::TypeMismatch {
                            kind: mismatch_kind(category),
                            left: left.to_string(),
                            right: right.to_string(),
                        },
                        expr.span,
                    ));
                }

                match category {
                    OpCategory::StrongArith | OpCategory::WeakArith => Type::Int,
                    OpCategory::Relational | OpCategory::Conditional | OpCategory::Equality => {
                        Type::Boolean
                    }
                }
            }
        }
    }

    fn operands_ok(&self, category: OpCategory, left: Type, right: Type) -> bool {
        let both_int = left.is_int() && right.is_int();
        let both_boolean = left.is_boolean() && right.is_boolean();

        if self.legacy() {
            return match category {
                OpCategory::StrongArith => both_int,
                OpCategory::WeakArith | OpCategory::Relational => !both_int,
                OpCategory::Conditional => !both_boolean,
                OpCategory::Equality => left != right,
            };
        }

        if left.is_unknown() || right.is_unknown() {
            return true;
        }
        match category {
            OpCategory::StrongArith | OpCategory::WeakArith | OpCategory::Relational => both_int,
            OpCategory::Conditional => both_boolean,
            OpCategory::Equality => left.is_scalar() && left == right,
        }
    }

    fn type_of_literal(&self, lit: &Literal) -> Type {
        match lit {
            Literal::Int(_) => Type::Int,
            Literal::Bool(_) => Type::Boolean,
            Literal::Char(_) if self.legacy() => Type::Boolean,
            Literal::Char(_) => Type::Int,
        }
    }

    /// Resolve a location, reporting an undeclared name at `line`
    fn type_of_location(&mut self, loc: &Location, line: usize, target: bool) -> Type {
        let index_ty = loc.index.as_deref().map(|index| (index, self.type_of(index)));
        let span = Span::new(loc.span.start, loc.span.end, line);

        let Some(symbol) = self.scopes.resolve(&loc.name).cloned() else {
            self.report(Diagnostic::new(
                DiagnosticKind::UndeclaredVariable { name: loc.name.clone(), target },
                span,
            ));
            return Type::Unknown;
        };
        if symbol.is_method() {
            self.report(Diagnostic::new(
                DiagnosticKind::NotAVariable { name: loc.name.clone() },
                span,
            ));
            return Type::Unknown;
        }

        let Some((index, index_ty)) = index_ty else {
            return symbol.ty;
        };
        let Some(element) = symbol.ty.element() else {
            self.report(Diagnostic::new(
                DiagnosticKind::NotAnArray { name: loc.name.clone() },
                span,
            ));
            return Type::Unknown;
        };
        if !index_ty.is_int() && !index_ty.is_unknown() {
            self.report(Diagnostic::new(
                DiagnosticKind::TypeMismatch {
                    kind: MismatchKind::ArrayIndex,
                    left: index.to_string(),
                    right: index_ty.to_string(),
                },
                index.span,
            ));
        }
        element
    }

    /// Return type of a call; arguments are always typed
    fn type_of_call(&mut self, call: &MethodCall) -> Type {
        match &call.kind {
            CallKind::Callout { args, .. } => {
                for arg in args {
                    if let CalloutArg::Expr(expr) = arg {
                        self.type_of(expr);
                    }
                }
                Type::Int
            }
            CallKind::Method { name, args } => {
                let arg_types: Vec<Type> = args.iter().map(|arg| self.type_of(arg)).collect();

                let Some(symbol) = self.scopes.resolve(name).cloned() else {
                    self.report(Diagnostic::new(
                        DiagnosticKind::UndeclaredMethod { name: name.clone() },
                        call.span,
                    ));
                    return Type::Unknown;
                };
                let SymbolKind::Method { params } = &symbol.kind else {
                    self.report(Diagnostic::new(
                        DiagnosticKind::NotCallable { name: name.clone() },
                        call.span,
                    ));
                    return Type::Unknown;
                };

                if params.len() != arg_types.len() {
                    self.report(Diagnostic::new(
                        DiagnosticKind::ArgumentCount {
                            method: name.clone(),
                            expected: params.len(),
                            found: arg_types.len(),
                        },
                        call.span,
                    ));
                } else {
                    for (position, (param, found)) in params.iter().zip(&arg_types).enumerate() {
                        let expected = Type::from(*param);
                        if *found != expected && !found.is_unknown() {
                            self.report(Diagnostic::new(
                                DiagnosticKind::ArgumentType {
                                    method: name.clone(),
                                    position: position + 1,
                                    expected,
                                    found: *found,
                                },
                                args[position].span,
                            ));
                        }
                    }
                }
                symbol.ty
            }
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

fn mismatch_kind(category: OpCategory) -> MismatchKind {
    match category {
        OpCategory::StrongArith => MismatchKind::StrongArith,
        OpCategory::WeakArith => MismatchKind::WeakArith,
        OpCategory::Relational => MismatchKind::Relational,
        OpCategory::Conditional => MismatchKind::Conditional,
        OpCategory::Equality => MismatchKind::Equality,
    }
}

/// Array size token as a strictly positive `int` (decimal or `0x` hex)
fn parse_array_size(text: &str) -> Option<u32> {
    let value = match text.strip_prefix("0x") {
        Some(hex) => i32::from_str_radix(hex, 16).ok()?,
        None => text.parse::<i32>().ok()?,
    };
    u32::try_from(value).ok().filter(|&len| len > 0)
}

/// Analyze a program with the default rule set
pub fn analyze_program(program: &Program) -> Vec<Diagnostic> {
    Analyzer::default().analyze(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::decaf::parser::parse_program;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_array_size() {
        assert_eq!(parse_array_size("10"), Some(10));
        assert_eq!(parse_array_size("0x1F"), Some(31));
        assert_eq!(parse_array_size("0"), None);
        assert_eq!(parse_array_size("0x0"), None);
        assert_eq!(parse_array_size("99999999999"), None);
        assert_eq!(parse_array_size("2147483647"), Some(2_147_483_647));
        assert_eq!(parse_array_size("2147483648"), None);
        assert_eq!(parse_array_size("0x7FFFFFFF"), Some(0x7FFF_FFFF));
        assert_eq!(parse_array_size("0x80000000"), None);
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn check_with(source: &str, rules: RuleSet) -> Vec<Diagnostic> {
        init_logger();
        let program = parse_program(source).expect("test program should parse");
        Analyzer::new(AnalyzerConfig { rules }).analyze(&program)
    }

    fn check(source: &str) -> Vec<Diagnostic> {
        check_with(source, RuleSet::Standard)
    }

    /// `(line, message)` pairs, the observable output of an analysis
    fn lines(diagnostics: &[Diagnostic]) -> Vec<(usize, String)> {
        diagnostics.iter().map(|d| (d.line, d.message())).collect()
    }

    fn kinds(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
        diagnostics.iter().map(|d| d.kind.name()).collect()
    }

    /// Wraps statements in `void main` after the given declarations
    fn in_main(decls: &str, body: &str) -> String {
        format!("class Program {{\n{}\nvoid main() {{\n{}\n}}\n}}\n", decls, body)
    }

    #[test]
    fn test_well_typed_program_has_no_diagnostics() {
        let source = r#"class Program {
        int counts[10], total;
        boolean done;

        int sum(int n) {
            int i, acc;
            acc = 0;
            for i = 0, n {
                acc += counts[i];
                if (acc > 100 || done) {
                    break;
                }
            }
            return acc;
        }

        void main() {
            boolean big;
            total = sum(10) * 2 - -1;
            big = total >= 50 && !done;
            done = big == (total != 0);
            callout("printf", "%d\n", total);
            {
                int total;
                total = 'a' + 1;
            }
        }
    }
    "#;
        assert_eq!(lines(&check(source)), vec![]);
    }

    #[test]
    fn test_declared_names_resolve_to_their_symbols() {
        let source = in_main(
            "int a;\nboolean b;\nint c[3];",
            "a = c[1];\nb = a;\nc[0] = a;\nb = b;\nb = c;",
        );
        // Each name binds to its own declaration, so only the cross-type uses fire
        assert_eq!(
            lines(&check(&source)),
            vec![
                (7, "Type mismatch, cannot perform operation on types boolean and int".to_string()),
                (10, "Type mismatch, cannot perform operation on types boolean and int[3]".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_declarations_fire_per_redeclaration() {
        let source = in_main("int x;\nboolean x;\nint x;", "");
        let diagnostics = check(&source);

        assert_eq!(
            lines(&diagnostics),
            vec![
                (3, "Already exists: x, boolean".to_string()),
                (4, "Already exists: x, int".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_local_and_parameter() {
        let source = "class Program {\nvoid f(int a, int a) {\nint b, b;\n}\nvoid main() {}\n}";
        assert_eq!(
            lines(&check(source)),
            vec![
                (2, "Already exists: a, int".to_string()),
                (3, "Already exists: b, int".to_string()),
            ]
        );
    }

    #[test]
    fn test_local_clashing_with_parameter() {
        let source = "class Program {\nvoid f(int a) {\nboolean a;\n}\nvoid main() {}\n}";
        assert_eq!(kinds(&check(source)), vec!["DuplicateDeclaration"]);
    }

    #[test]
    fn test_shadowing_is_not_a_duplicate() {
        let source = in_main(
            "int x;",
            "boolean x;\nx = true;\n{ int x; x = 3; }\nx = false;",
        );
        assert_eq!(lines(&check(&source)), vec![]);
    }

    #[test]
    fn test_inner_scope_ends_with_block() {
        let source = in_main("", "{ int y; y = 1; }\ny = 2;");
        assert_eq!(
            lines(&check(&source)),
            vec![(5, "Variable not declared".to_string())]
        );
    }

    #[test]
    fn test_arithmetic_rules() {
        let source = in_main("int a; boolean b;", "a = a + a;\na = a * b;\na = b - 1;");
        let diagnostics = check(&source);

        assert_eq!(
            lines(&diagnostics),
            vec![
                (5, "Type mismatch, cannot perform operation on types a and b".to_string()),
                (6, "Type mismatch, cannot perform operation on types b and 1".to_string()),
            ]
        );
        assert!(matches!(
            diagnostics[0].kind,
            DiagnosticKind::TypeMismatch { kind: MismatchKind::StrongArith, .. }
        ));
        assert!(matches!(
            diagnostics[1].kind,
            DiagnosticKind::TypeMismatch { kind: MismatchKind::WeakArith, .. }
        ));
    }

    #[test]
    fn test_expression_types() {
        let cases = [
            ("1 + 1", Type::Int, 0),
            ("1 * true", Type::Int, 1),
            ("true && false", Type::Boolean, 0),
            ("1 && 2", Type::Boolean, 1),
            ("1 == 1", Type::Boolean, 0),
            ("1 == true", Type::Boolean, 1),
            ("3 < 4", Type::Boolean, 0),
            ("'a' % 2", Type::Int, 0),
            ("-true", Type::Int, 0),
            ("!3", Type::Boolean, 0),
        ];

        for (text, ty, count) in cases {
            // Callout arguments carry no constraints of their own
            let source = in_main("", &format!("callout(\"probe\", {});", text));
            let program = parse_program(&source).unwrap();
            let StmtKind::MethodCall(call) = &program.methods[0].body.statements[0].kind else {
                panic!("expected call statement");
            };
            let CallKind::Callout { args, .. } = &call.kind else {
                panic!("expected callout");
            };
            let CalloutArg::Expr(expr) = &args[0] else {
                panic!("expected expression argument");
            };

            assert_eq!(Analyzer::default().type_of(expr), ty, "type of {}", text);
            assert_eq!(check(&source).len(), count, "diagnostics for {}", text);
        }
    }

    #[test]
    fn test_conditional_and_equality_rules() {
        let source = in_main(
            "boolean r;",
            "r = true && false;\nr = 1 && 2;\nr = 1 == 1;\nr = 1 == true;",
        );
        assert_eq!(
            lines(&check(&source)),
            vec![
                (5, "Type mismatch, cannot perform operation on types 1 and 2".to_string()),
                (7, "Type mismatch, cannot perform operation on types 1 and true".to_string()),
            ]
        );
    }

    #[test]
    fn test_relational_requires_int() {
        let source = in_main("boolean r;", "r = 1 < 2;\nr = r <= 2;");
        assert_eq!(
            lines(&check(&source)),
            vec![(5, "Type mismatch, cannot perform operation on types r and 2".to_string())]
        );
    }

    #[test]
    fn test_nested_mismatch_does_not_stop_outer_checks() {
        let source = in_main("int a;", "a = (a * true) + (false - 1);");
        let diagnostics = check(&source);
        assert_eq!(
            lines(&diagnostics),
            vec![
                (4, "Type mismatch, cannot perform operation on types a and true".to_string()),
                (4, "Type mismatch, cannot perform operation on types false and 1".to_string()),
            ]
        );
    }

    #[test]
    fn test_assignment_rules() {
        let source = in_main("int a; boolean b;", "a = 1;\nb = true;\na = b;\nb += true;\na -= 2;");
        assert_eq!(
            lines(&check(&source)),
            vec![
                (6, "Type mismatch, cannot perform operation on types int and boolean".to_string()),
                (7, "Type mismatch, cannot perform operation on types boolean and boolean".to_string()),
            ]
        );
    }

    #[test]
    fn test_undeclared_assignment_target_continues() {
        let source = in_main("int a;", "missing = 1;\na = missing + 1;\na = true;");
        assert_eq!(
            lines(&check(&source)),
            vec![
                (4, "Variable not declared".to_string()),
                (5, "Variable not declared: missing".to_string()),
                (6, "Type mismatch, cannot perform operation on types int and boolean".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_operands_do_not_cascade() {
        let source = in_main("boolean b;", "b = ghost && (ghost * 2 > 1);");
        let diagnostics = check(&source);
        assert_eq!(kinds(&diagnostics), vec!["UndeclaredVariable", "UndeclaredVariable"]);
    }

    #[test]
    fn test_invalid_array_size_still_registers() {
        let source = "class Program {\nint a[0], b[0x0], c[5];\nvoid main() {\na[0] = 1;\nc[1] = a[2];\n}\n}";
        let diagnostics = check(source);
        assert_eq!(
            lines(&diagnostics),
            vec![
                (2, "Invalid array size on array named: a".to_string()),
                (2, "Invalid array size on array named: b".to_string()),
            ]
        );
    }

    #[test]
    fn test_array_indexing() {
        let source = in_main(
            "int arr[4]; int n; boolean flags[2];",
            "arr[true] = 1;\nn[0] = 1;\nn = flags[1];\narr = 3;",
        );
        let diagnostics = check(&source);
        assert_eq!(
            lines(&diagnostics),
            vec![
                (4, "Array index true must be int, found boolean".to_string()),
                (5, "'n' is not an array".to_string()),
                (6, "Type mismatch, cannot perform operation on types int and boolean".to_string()),
                (7, "Type mismatch, cannot perform operation on types int[4] and int".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_main_is_reported_last() {
        let source = "class Program {\nint x, x;\nvoid helper() {\ny = 1;\n}\n}\n";
        let diagnostics = check(source);

        assert_eq!(
            kinds(&diagnostics),
            vec!["DuplicateDeclaration", "UndeclaredVariable", "MissingMainMethod"]
        );
        let last = diagnostics.last().unwrap();
        assert_eq!(last.line, 6);
        assert_eq!(last.to_string(), "Error line 6: No Main Method");
    }

    #[test]
    fn test_main_as_field_is_not_a_method() {
        let source = "class Program {\nint main;\n}";
        assert_eq!(kinds(&check(source)), vec!["MissingMainMethod"]);
    }

    #[test]
    fn test_method_calls() {
        let source = r#"class Program {
    int twice(int x) {
    return x * 2;
    }
    void log(boolean b) {
    }
    void main() {
    int r;
    boolean f;
    r = twice(3);
    f = twice(1);
    r = twice(true);
    r = twice(1, 2);
    r = later();
    log(r);
    r = r(1);
    r = log(true);
    }
    int later() {
    return 1;
    }
    }"#;
        let diagnostics = check(source);
        assert_eq!(
            lines(&diagnostics),
            vec![
                (11, "Type mismatch, cannot perform operation on types boolean and int".to_string()),
                (12, "Argument 1 of twice must be int, found boolean".to_string()),
                (13, "Method twice expects 1 arguments, found 2".to_string()),
                (14, "Method not declared: later".to_string()),
                (15, "Argument 1 of log must be boolean, found int".to_string()),
                (16, "'r' is not a method".to_string()),
                (17, "Type mismatch, cannot perform operation on types int and void".to_string()),
            ]
        );
    }

    #[test]
    fn test_recursive_call_resolves() {
        let source = "class Program {\nint fact(int n) {\nif (n <= 1) { return 1; }\nreturn n * fact(n - 1);\n}\nvoid main() {}\n}";
        assert_eq!(lines(&check(source)), vec![]);
    }

    #[test]
    fn test_method_name_used_as_variable() {
        let source = in_main("", "main = 1;");
        assert_eq!(
            lines(&check(&source)),
            vec![(4, "'main' is a method, not a variable".to_string())]
        );
    }

    #[test]
    fn test_method_clashing_with_field() {
        let source = "class Program {\nint f;\nvoid f() {}\nvoid main() {}\n}";
        assert_eq!(
            lines(&check(source)),
            vec![(3, "Already exists: f, void".to_string())]
        );
    }

    #[test]
    fn test_statement_checks() {
        let source = r#"class Program {
    int value() {
    return;
    }
    void main() {
    int i;
    boolean b;
    if (i) { }
    for b = true, 3 { continue; }
    break;
    return 1;
    }
    }"#;
        assert_eq!(
            lines(&check(source)),
            vec![
                (3, "Method value must return int, found void".to_string()),
                (8, "Condition must be boolean, found int".to_string()),
                (9, "Loop variable b must be int, found boolean".to_string()),
                (9, "Loop bound true must be int, found boolean".to_string()),
                (10, "break statement outside of a loop".to_string()),
                (11, "Method main must return void, found int".to_string()),
            ]
        );
    }

    #[test]
    fn test_undeclared_loop_variable() {
        let source = in_main("", "for k = 0, 3 { }");
        assert_eq!(kinds(&check(&source)), vec!["UndeclaredVariable"]);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let source = in_main("int x, x; int a[0];", "y = 1 + true;\nb = !z;");
        let program = parse_program(&source).unwrap();

        let mut analyzer = Analyzer::default();
        let first = analyzer.analyze(&program);
        let second = analyzer.analyze(&program);
        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert_eq!(first, analyze_program(&program));
    }

    // =============================================================================
    // Legacy rule set
    // =============================================================================

    #[test]
    fn test_legacy_reproduces_inverted_checks() {
        let source = in_main(
            "int a; boolean b;",
            "a = 1 + 1;\nb = true && true;\nb = 1 == 1;\nb = 1 < 2;\na = 2 * 3;\nb = true;",
        );
        let diagnostics = check_with(&source, RuleSet::Legacy);
        assert_eq!(
            lines(&diagnostics),
            vec![
                (4, "Type mismatch, cannot perform operation on types 1 and 1".to_string()),
                (5, "Type mismatch, cannot perform operation on types true and true".to_string()),
                (5, "Type mismatch, cannot perform operation on types boolean and boolean".to_string()),
                (6, "Type mismatch, cannot perform operation on types 1 and 1".to_string()),
                (6, "Type mismatch, cannot perform operation on types boolean and boolean".to_string()),
                (7, "Type mismatch, cannot perform operation on types 1 and 2".to_string()),
                (7, "Type mismatch, cannot perform operation on types boolean and boolean".to_string()),
                (9, "Type mismatch, cannot perform operation on types boolean and boolean".to_string()),
            ]
        );
    }

    #[test]
    fn test_legacy_strong_arithmetic_matches_standard() {
        let source = in_main("int a; boolean b;", "a = a * b;");
        let legacy = check_with(&source, RuleSet::Legacy);
        let standard = check(&source);
        assert_eq!(lines(&legacy), lines(&standard));
    }

    #[test]
    fn test_legacy_char_literal_is_boolean() {
        let source = in_main("int a;", "a = 'x';");
        assert_eq!(
            lines(&check_with(&source, RuleSet::Legacy)),
            vec![(4, "Type mismatch, cannot perform operation on types int and boolean".to_string())]
        );
        assert_eq!(lines(&check(&source)), vec![]);
    }

    #[test]
    fn test_legacy_undeclared_target_reports_once() {
        let source = in_main("", "missing = 1;");
        let expected = vec![(4, "Variable not declared".to_string())];
        assert_eq!(lines(&check_with(&source, RuleSet::Legacy)), expected);
        assert_eq!(lines(&check(&source)), expected);
    }
}
