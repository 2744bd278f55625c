//! Function and class checking
//!
//! Functions and methods share one return rule: an annotated return type is
//! enforced against every reachable `return`; without an annotation the
//! return type is the common type of those returns, or unknown.
//!
//! Classes are checked in two passes. The first checks every method body in
//! discovery mode, with its scopes live but nothing recorded, and collects the
//! value type of each `self.field := value`. The second builds the self type
//! from the finished field list and provisional method signatures, and only
//! then checks the method bodies for real. Nested functions and classes are
//! entered in the second pass only; a field they left unknown takes its type
//! from that check.

use std::convert::Infallible;

use sable_ast::{
    walk_stmts_mut, ClassExpr, ClassMethod, Expr, FunctionExpr, Ident, MethodKind, Node, Param,
    Span, Stmt, SymbolId, TypeExpr, Walk,
};

use crate::checker::{TypeChecker, SELF_NAME};
use crate::error::{TypeError, TypeErrorKind};
use crate::helpers::TypeHelpers;
use crate::returns::collect_returns;
use crate::trace::{TraceData, TraceKind};
use crate::types::{Field, Type};

impl TypeChecker<'_> {
    pub(crate) fn check_function(&mut self, func: &mut FunctionExpr) -> Result<Type, TypeError> {
        let FunctionExpr {
            name,
            type_params,
            params,
            return_type,
            body,
        } = func;

        let ty = self.with_scope(|this| {
            this.bind_type_params(type_params);
            let param_types = this.bind_params(params)?;
            let annotation = return_type
                .as_ref()
                .map(|ty| this.resolve_type_expr(ty))
                .transpose()?;

            // Visible to its own body for recursion
            if let Some(name) = name.as_ref() {
                let provisional = Type::function(
                    param_types.clone(),
                    annotation.clone().unwrap_or(Type::Unknown),
                );
                this.bind(name.value.symbol, provisional);
            }

            this.check_stmts(body)?;
            let returns = this.infer_return_type(body, annotation)?;
            Ok(Type::function(param_types, returns))
        })?;

        if let Some(name) = name {
            self.bind(name.value.symbol, ty.clone());
            self.record(name, &ty);
        }
        Ok(ty)
    }

    /// Bind parameters in the current scope; their declared types, or unknown.
    pub(crate) fn bind_params(&mut self, params: &mut [Param]) -> Result<Vec<Type>, TypeError> {
        let mut types = Vec::with_capacity(params.len());
        for param in params.iter_mut() {
            let ty = self.param_type(param)?;
            self.bind(param.name.value.symbol, ty.clone());
            self.record(&mut param.name, &ty);
            types.push(ty);
        }
        Ok(types)
    }

    fn param_type(&self, param: &Param) -> Result<Type, TypeError> {
        match &param.type_annotation {
            Some(annotation) => self.resolve_type_expr(annotation),
            None => Ok(Type::Unknown),
        }
    }

    /// Return type of an already checked body.
    pub(crate) fn infer_return_type(
        &mut self,
        body: &mut [Node<Stmt>],
        annotation: Option<Type>,
    ) -> Result<Type, TypeError> {
        let sites = collect_returns(body);

        let Some(declared) = annotation else {
            let found: Vec<Type> = sites.iter().map(|site| self.type_of(site.value)).collect();
            return Ok(TypeHelpers::common_type(&found).unwrap_or(Type::Unknown));
        };

        let is_void = declared == Type::Undefined;
        for site in &sites {
            if is_void && site.value.is_some() {
                return Err(TypeError::new(
                    TypeErrorKind::ValueReturnFromVoid,
                    site.span,
                ));
            }
            let found = self.type_of(site.value);
            if !TypeHelpers::is_assignable(&found, &declared) {
                return Err(TypeError::new(
                    TypeErrorKind::ReturnMismatch {
                        expected: declared,
                        found,
                    },
                    site.span,
                ));
            }
        }
        Ok(declared)
    }

    pub(crate) fn check_class(&mut self, class: &mut ClassExpr) -> Result<Type, TypeError> {
        let self_symbol = self.fresh_class_symbol();
        let retargeted = retarget_self_references(class, self_symbol);
        for span in retargeted {
            self.emit(
                TraceKind::SelfRetarget,
                Some(span),
                TraceData::SelfRetarget {
                    name: SELF_NAME.to_string(),
                    symbol: self_symbol,
                },
            );
        }

        // A class nested in a method of another class is checked on its own
        let enclosing = self.discovery.take();
        let ty = self.with_scope(|this| this.check_class_members(class, self_symbol));
        self.discovery = enclosing;
        let ty = ty?;

        if let Some(name) = &mut class.name {
            self.bind(name.value.symbol, ty.clone());
            self.record(name, &ty);
        }
        Ok(ty)
    }

    fn check_class_members(
        &mut self,
        class: &mut ClassExpr,
        self_symbol: SymbolId,
    ) -> Result<Type, TypeError> {
        let fields = self.check_class_fields(class)?;

        // Pass 1: field discovery
        self.bind(Some(self_symbol), Type::Unknown);
        self.discovery = Some(FieldDiscovery::scratch(self_symbol, fields));
        for method in class.methods.iter_mut() {
            let scanned = self.with_scope(|this| {
                this.bind_type_params(&method.value.type_params);
                this.bind_params(&mut method.value.params)?;
                this.check_stmts(&mut method.value.body)
            });
            // Reported again, with its real types, in pass 2
            if let Err(err) = scanned {
                tracing::trace!(method = %method.value.name.value, "{}", err.kind);
            }
        }
        let fields = self
            .discovery
            .take()
            .map_or_else(Vec::new, |discovery| discovery.fields);

        // Pass 2: fixed self type, then method bodies
        let mut members = fields.clone();
        for method in &class.methods {
            if let Some(name) = method_entry_name(&method.value, &fields) {
                let signature = self.with_scope(|this| {
                    let method = &method.value;
                    this.signature(&method.type_params, &method.params, method.return_type.as_ref())
                })?;
                members.push(Field::new(name, signature));
            }
        }
        let self_ty = Type::object(members);
        tracing::trace!(%self_symbol, ty = %self_ty, "self type");
        self.bind(Some(self_symbol), self_ty.clone());
        if let Some(name) = &class.name {
            self.bind(name.value.symbol, self_ty);
        }

        // Fields still unknown take the first value assigned in a checked body
        self.discovery = Some(FieldDiscovery::refining(self_symbol, fields.clone()));
        let mut methods = Vec::with_capacity(class.methods.len());
        for method in class.methods.iter_mut() {
            let method_ty = self.check_method(method)?;
            if let Some(name) = method_entry_name(&method.value, &fields) {
                methods.push(Field::new(name, method_ty));
            }
        }
        let mut members = self
            .discovery
            .take()
            .map_or(fields, |discovery| discovery.fields);
        members.extend(methods);
        Ok(Type::object(members))
    }

    fn check_class_fields(&mut self, class: &mut ClassExpr) -> Result<Vec<Field>, TypeError> {
        let mut fields: Vec<Field> = Vec::with_capacity(class.fields.len());
        for field in class.fields.iter_mut() {
            let init_ty = match &mut field.init {
                Some(init) => Some(self.check_expr(init)?),
                None => None,
            };
            let ty = match (&field.type_annotation, init_ty) {
                (Some(annotation), init_ty) => {
                    let declared = self.resolve_type_expr(annotation)?;
                    if let (Some(init_ty), Some(init)) = (init_ty, &field.init) {
                        self.expect_assignable(&init_ty, &declared, init.span)?;
                    }
                    declared
                }
                (None, Some(init_ty)) => TypeHelpers::widen(&init_ty),
                (None, None) => Type::Unknown,
            };
            self.record(&mut field.name, &ty);
            upsert_field(&mut fields, &field.name.value.name, ty);
        }
        Ok(fields)
    }

    /// Declared signature, without looking at the body. Runs in the caller's scope.
    fn signature(
        &mut self,
        type_params: &[Node<Ident>],
        params: &[Param],
        return_type: Option<&Node<TypeExpr>>,
    ) -> Result<Type, TypeError> {
        self.bind_type_params(type_params);
        let params = params
            .iter()
            .map(|param| self.param_type(param))
            .collect::<Result<Vec<_>, _>>()?;
        let returns = self.resolve_optional(return_type)?.unwrap_or(Type::Unknown);
        Ok(Type::function(params, returns))
    }

    /// Stand-in for a function expression met during field discovery.
    pub(crate) fn function_signature(&mut self, func: &FunctionExpr) -> Result<Type, TypeError> {
        let ty = self.with_scope(|this| {
            this.signature(&func.type_params, &func.params, func.return_type.as_ref())
        })?;
        if let Some(name) = &func.name {
            self.bind(name.value.symbol, ty.clone());
        }
        Ok(ty)
    }

    fn check_method(&mut self, method: &mut Node<ClassMethod>) -> Result<Type, TypeError> {
        let span = method.span;
        let ClassMethod {
            kind,
            type_params,
            params,
            return_type,
            body,
            ..
        } = &mut method.value;

        if *kind == MethodKind::Constructor && return_type.is_some() {
            return Err(TypeError::new(
                TypeErrorKind::ConstructorReturnAnnotation,
                span,
            ));
        }

        let ty = self.with_scope(|this| {
            this.bind_type_params(type_params);
            let param_types = this.bind_params(params)?;
            let annotation = this.resolve_optional(return_type.as_ref())?;
            this.check_stmts(body)?;
            let returns = this.infer_return_type(body, annotation)?;
            Ok(Type::function(param_types, returns))
        })?;
        self.record(method, &ty);
        Ok(ty)
    }

    fn resolve_optional(&self, ty: Option<&Node<TypeExpr>>) -> Result<Option<Type>, TypeError> {
        ty.map(|ty| self.resolve_type_expr(ty)).transpose()
    }
}

/// Point every self-reference in the class's method bodies at `symbol`.
///
/// Nested functions and classes are left alone. Returns the spans rewritten.
fn retarget_self_references(class: &mut ClassExpr, symbol: SymbolId) -> Vec<Span> {
    let mut spans = Vec::new();
    for method in class.methods.iter_mut() {
        walk_stmts_mut(&mut method.value.body, &mut |expr: &mut Node<Expr>| {
            if expr.value.is_function_boundary() {
                return Ok::<_, Infallible>(Walk::SkipChildren);
            }
            if let Expr::Ident(ident) = &mut expr.value {
                if ident.name == SELF_NAME {
                    ident.symbol = Some(symbol);
                    spans.push(expr.span);
                }
            }
            Ok(Walk::Continue)
        })
        .unwrap_or_else(|never| match never {});
    }
    spans
}

/// Name under which a method appears on the instance type, if it does.
///
/// Constructors are not instance members; a method named like a field is
/// shadowed by the field.
fn method_entry_name(method: &ClassMethod, fields: &[Field]) -> Option<String> {
    let Ident { name, .. } = &method.name.value;
    if method.kind == MethodKind::Constructor || fields.iter().any(|f| &f.name == name) {
        return None;
    }
    Some(name.clone())
}

/// Field types collected from `self.<field> := value` in method bodies
#[derive(Debug)]
pub(crate) struct FieldDiscovery {
    self_symbol: SymbolId,
    pub(crate) fields: Vec<Field>,
    /// Pass 1: bodies are checked without recording anything
    pub(crate) scratch: bool,
}

impl FieldDiscovery {
    pub(crate) fn scratch(self_symbol: SymbolId, fields: Vec<Field>) -> Self {
        Self {
            self_symbol,
            fields,
            scratch: true,
        }
    }

    pub(crate) fn refining(self_symbol: SymbolId, fields: Vec<Field>) -> Self {
        Self {
            self_symbol,
            fields,
            scratch: false,
        }
    }

    /// Note an assignment whose value was checked as `value`.
    ///
    /// Only `self.<field>` targets count. A new field gets the widened value
    /// type and a field still typed unknown is refined. Any other field keeps
    /// its type, so a conflicting assignment is reported in pass 2.
    pub(crate) fn observe(&mut self, target: &Node<Expr>, value: &Type) {
        let Expr::Member { object, property } = &target.value else {
            return;
        };
        if !matches!(&object.value, Expr::Ident(ident) if ident.symbol == Some(self.self_symbol)) {
            return;
        }

        let ty = TypeHelpers::widen(value);
        let name = &property.value.name;
        match self.fields.iter_mut().find(|f| &f.name == name) {
            None => self.fields.push(Field::new(name.clone(), ty)),
            Some(field) if field.ty.is_unknown() => field.ty = ty,
            Some(_) => {}
        }
    }
}

fn upsert_field(fields: &mut Vec<Field>, name: &str, ty: Type) {
    match fields.iter_mut().find(|f| f.name == name) {
        Some(field) => field.ty = ty,
        None => fields.push(Field::new(name, ty)),
    }
}
