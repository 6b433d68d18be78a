//! Syn Lowering
//!
//! Parses Rust source with `syn` and lowers the typed syntax tree into generic
//! `AstNode`s whose kinds are registered in `SchemaRegistry::rust()`.
//!
//! Doc comments are split off the attribute list and attached as a separate
//! `doc` child so the renderer can leave them out. Syntax without a dedicated
//! kind becomes a `Verbatim` node holding its token text.
//!
//! Attributes on an expression are kept only in statement position, where they
//! land on the enclosing `StmtExpr`. Expression kinds carry no `attrs` slot.

use quote::ToTokens;
use syn::spanned::Spanned;
use syn::{
    Abi, AttrStyle, Attribute, Block, Expr, ExprLit, ExprPath, ExprRange, Field, Fields, FnArg,
    GenericParam, Generics, ImplItem, Item, Label, Lit, Macro, MacroDelimiter, Member, Meta,
    MetaNameValue, Pat, PatType, PathArguments, RangeLimits, ReturnType, Signature,
    StaticMutability, Stmt, TraitItem, Type, Variant, Visibility,
};
use tracing::debug;

use crate::domain::ast::{AstNode, ScalarValue};
use crate::domain::schema::DOC_COMMENT_KIND;
use crate::error::{Result, ViewerError};
use crate::ports::AstParser;

pub struct SynAstParser;

impl AstParser for SynAstParser {
    fn parse(&self, src: &str) -> Result<AstNode> {
        let file = syn::parse_file(src).map_err(|e| {
            let start = e.span().start();
            ViewerError::Parse {
                line: start.line,
                column: start.column + 1,
                message: e.to_string(),
            }
        })?;
        Ok(lower_file(&file))
    }
}

pub fn lower_file(file: &syn::File) -> AstNode {
    with_attrs(
        AstNode::new("File").with_scalar_opt("shebang", file.shebang.clone()),
        &file.attrs,
    )
    .with_children("items", file.items.iter().map(lower_item))
}

// ═══════════════════════════════════════════════════════════════════════════
// Attributes
// ═══════════════════════════════════════════════════════════════════════════

/// Adds the `attrs` list and, when doc comments are present, the `doc` child.
fn with_attrs(node: AstNode, attrs: &[Attribute]) -> AstNode {
    let mut lines = Vec::new();
    let mut doc_style = None;
    let mut others = Vec::new();

    for attr in attrs {
        match doc_text(attr) {
            Some(text) => {
                doc_style.get_or_insert(attr_style(attr));
                lines.push(AstNode::new("DocLine").with_scalar("text", text));
            }
            None => others.push(lower_attribute(attr)),
        }
    }

    let doc = doc_style.map(|style| {
        AstNode::new(DOC_COMMENT_KIND)
            .with_scalar("style", style)
            .with_children("lines", lines)
    });
    node.with_children("attrs", others).with_child_opt("doc", doc)
}

/// Ordinary attributes only. Doc comments on kinds without a `doc` slot are
/// dropped rather than shown as `#[doc]` attributes.
fn lower_attrs(attrs: &[Attribute]) -> Vec<AstNode> {
    attrs
        .iter()
        .filter(|attr| doc_text(attr).is_none())
        .map(lower_attribute)
        .collect()
}

fn lower_attribute(attr: &Attribute) -> AstNode {
    let args = match &attr.meta {
        Meta::Path(_) => None,
        Meta::List(list) => non_empty(&list.tokens.to_string()),
        Meta::NameValue(nv) => Some(tokens_text(&nv.value)),
    };
    AstNode::new("Attribute")
        .with_scalar("style", attr_style(attr))
        .with_scalar("path", path_text(attr.path()))
        .with_scalar_opt("args", args)
}

fn doc_text(attr: &Attribute) -> Option<String> {
    if !attr.path().is_ident("doc") {
        return None;
    }
    match &attr.meta {
        Meta::NameValue(MetaNameValue {
            value: Expr::Lit(ExprLit { lit: Lit::Str(s), .. }),
            ..
        }) => Some(s.value().trim().to_string()),
        _ => None,
    }
}

fn attr_style(attr: &Attribute) -> &'static str {
    match attr.style {
        AttrStyle::Outer => "outer",
        AttrStyle::Inner(_) => "inner",
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Items
// ═══════════════════════════════════════════════════════════════════════════

fn lower_item(item: &Item) -> AstNode {
    match item {
        Item::Fn(f) => with_attrs(AstNode::new("ItemFn"), &f.attrs)
            .with_scalar_opt("vis", vis_text(&f.vis))
            .with_child("sig", lower_signature(&f.sig))
            .with_child("block", lower_block(&f.block)),
        Item::Struct(s) => {
            let (style, fields) = lower_fields(&s.fields);
            with_attrs(AstNode::new("ItemStruct"), &s.attrs)
                .with_scalar_opt("vis", vis_text(&s.vis))
                .with_scalar("ident", s.ident.to_string())
                .with_child("generics", lower_generics(&s.generics))
                .with_scalar("style", style)
                .with_children("fields", fields)
        }
        Item::Enum(e) => with_attrs(AstNode::new("ItemEnum"), &e.attrs)
            .with_scalar_opt("vis", vis_text(&e.vis))
            .with_scalar("ident", e.ident.to_string())
            .with_child("generics", lower_generics(&e.generics))
            .with_children("variants", e.variants.iter().map(lower_variant)),
        Item::Union(u) => with_attrs(AstNode::new("ItemUnion"), &u.attrs)
            .with_scalar_opt("vis", vis_text(&u.vis))
            .with_scalar("ident", u.ident.to_string())
            .with_child("generics", lower_generics(&u.generics))
            .with_children("fields", u.fields.named.iter().map(lower_field)),
        Item::Impl(i) => with_attrs(AstNode::new("ItemImpl"), &i.attrs)
            .with_scalar("unsafe", i.unsafety.is_some())
            .with_child("generics", lower_generics(&i.generics))
            .with_scalar("negative", matches!(&i.trait_, Some((Some(_), _, _))))
            .with_child_opt("trait", i.trait_.as_ref().map(|(_, path, _)| lower_path(path)))
            .with_child("self_ty", lower_type(&i.self_ty))
            .with_children("items", i.items.iter().map(lower_impl_item)),
        Item::Trait(t) => with_attrs(AstNode::new("ItemTrait"), &t.attrs)
            .with_scalar_opt("vis", vis_text(&t.vis))
            .with_scalar("unsafe", t.unsafety.is_some())
            .with_scalar("auto", t.auto_token.is_some())
            .with_scalar("ident", t.ident.to_string())
            .with_child("generics", lower_generics(&t.generics))
            .with_scalar_opt("supertraits", non_empty(&tokens_text(&t.supertraits)))
            .with_children("items", t.items.iter().map(lower_trait_item)),
        Item::Mod(m) => with_attrs(AstNode::new("ItemMod"), &m.attrs)
            .with_scalar_opt("vis", vis_text(&m.vis))
            .with_scalar("ident", m.ident.to_string())
            .with_scalar("inline", m.content.is_some())
            .with_children(
                "items",
                m.content
                    .iter()
                    .flat_map(|(_, items)| items.iter().map(lower_item)),
            ),
        Item::Use(u) => {
            let tree = match u.leading_colon {
                Some(_) => format!("::{}", tokens_text(&u.tree)),
                None => tokens_text(&u.tree),
            };
            with_attrs(AstNode::new("ItemUse"), &u.attrs)
                .with_scalar_opt("vis", vis_text(&u.vis))
                .with_scalar("tree", tree)
        }
        Item::Const(c) => with_attrs(AstNode::new("ItemConst"), &c.attrs)
            .with_scalar_opt("vis", vis_text(&c.vis))
            .with_scalar("ident", c.ident.to_string())
            .with_child("ty", lower_type(&c.ty))
            .with_child("expr", lower_expr(&c.expr)),
        Item::Static(s) => with_attrs(AstNode::new("ItemStatic"), &s.attrs)
            .with_scalar_opt("vis", vis_text(&s.vis))
            .with_scalar("mutable", matches!(s.mutability, StaticMutability::Mut(_)))
            .with_scalar("ident", s.ident.to_string())
            .with_child("ty", lower_type(&s.ty))
            .with_child("expr", lower_expr(&s.expr)),
        Item::Type(t) => with_attrs(AstNode::new("ItemType"), &t.attrs)
            .with_scalar_opt("vis", vis_text(&t.vis))
            .with_scalar("ident", t.ident.to_string())
            .with_child("generics", lower_generics(&t.generics))
            .with_child("ty", lower_type(&t.ty)),
        Item::Macro(m) => with_attrs(AstNode::new("ItemMacro"), &m.attrs)
            .with_scalar_opt("ident", m.ident.as_ref().map(ToString::to_string))
            .with_child("mac", lower_macro(&m.mac)),
        Item::ExternCrate(e) => with_attrs(AstNode::new("ItemExternCrate"), &e.attrs)
            .with_scalar_opt("vis", vis_text(&e.vis))
            .with_scalar("ident", e.ident.to_string())
            .with_scalar_opt("rename", e.rename.as_ref().map(|(_, ident)| ident.to_string())),
        other => verbatim("Item", other),
    }
}

fn lower_fields(fields: &Fields) -> (&'static str, Vec<AstNode>) {
    let style = match fields {
        Fields::Named(_) => "named",
        Fields::Unnamed(_) => "tuple",
        Fields::Unit => "unit",
    };
    (style, fields.iter().map(lower_field).collect())
}

fn lower_field(field: &Field) -> AstNode {
    with_attrs(AstNode::new("Field"), &field.attrs)
        .with_scalar_opt("vis", vis_text(&field.vis))
        .with_scalar_opt("ident", field.ident.as_ref().map(ToString::to_string))
        .with_child("ty", lower_type(&field.ty))
}

fn lower_variant(variant: &Variant) -> AstNode {
    let (style, fields) = lower_fields(&variant.fields);
    with_attrs(AstNode::new("Variant"), &variant.attrs)
        .with_scalar("ident", variant.ident.to_string())
        .with_scalar("style", style)
        .with_children("fields", fields)
        .with_child_opt(
            "discriminant",
            variant.discriminant.as_ref().map(|(_, e)| lower_expr(e)),
        )
}

fn lower_impl_item(item: &ImplItem) -> AstNode {
    match item {
        ImplItem::Fn(f) => with_attrs(AstNode::new("ImplItemFn"), &f.attrs)
            .with_scalar_opt("vis", vis_text(&f.vis))
            .with_child("sig", lower_signature(&f.sig))
            .with_child("block", lower_block(&f.block)),
        ImplItem::Const(c) => with_attrs(AstNode::new("ImplItemConst"), &c.attrs)
            .with_scalar_opt("vis", vis_text(&c.vis))
            .with_scalar("ident", c.ident.to_string())
            .with_child("ty", lower_type(&c.ty))
            .with_child("expr", lower_expr(&c.expr)),
        ImplItem::Type(t) => with_attrs(AstNode::new("ImplItemType"), &t.attrs)
            .with_scalar_opt("vis", vis_text(&t.vis))
            .with_scalar("ident", t.ident.to_string())
            .with_child("generics", lower_generics(&t.generics))
            .with_child("ty", lower_type(&t.ty)),
        ImplItem::Macro(m) => {
            with_attrs(AstNode::new("ItemMacro"), &m.attrs).with_child("mac", lower_macro(&m.mac))
        }
        other => verbatim("ImplItem", other),
    }
}

fn lower_trait_item(item: &TraitItem) -> AstNode {
    match item {
        TraitItem::Fn(f) => with_attrs(AstNode::new("TraitItemFn"), &f.attrs)
            .with_child("sig", lower_signature(&f.sig))
            .with_child_opt("default", f.default.as_ref().map(lower_block)),
        TraitItem::Const(c) => with_attrs(AstNode::new("TraitItemConst"), &c.attrs)
            .with_scalar("ident", c.ident.to_string())
            .with_child("ty", lower_type(&c.ty))
            .with_child_opt("default", c.default.as_ref().map(|(_, e)| lower_expr(e))),
        TraitItem::Type(t) => with_attrs(AstNode::new("TraitItemType"), &t.attrs)
            .with_scalar("ident", t.ident.to_string())
            .with_scalar_opt("bounds", non_empty(&tokens_text(&t.bounds)))
            .with_child_opt("default", t.default.as_ref().map(|(_, ty)| lower_type(ty))),
        TraitItem::Macro(m) => {
            with_attrs(AstNode::new("ItemMacro"), &m.attrs).with_child("mac", lower_macro(&m.mac))
        }
        other => verbatim("TraitItem", other),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Signatures and generics
// ═══════════════════════════════════════════════════════════════════════════

fn lower_signature(sig: &Signature) -> AstNode {
    AstNode::new("Signature")
        .with_scalar("const", sig.constness.is_some())
        .with_scalar("async", sig.asyncness.is_some())
        .with_scalar("unsafe", sig.unsafety.is_some())
        .with_scalar_opt("abi", sig.abi.as_ref().map(abi_text))
        .with_scalar("ident", sig.ident.to_string())
        .with_child("generics", lower_generics(&sig.generics))
        .with_children("inputs", sig.inputs.iter().map(lower_fn_arg))
        .with_scalar("variadic", sig.variadic.is_some())
        .with_child_opt("output", lower_return_type(&sig.output))
}

fn abi_text(abi: &Abi) -> String {
    match &abi.name {
        Some(name) => format!("extern \"{}\"", name.value()),
        None => "extern".to_string(),
    }
}

fn lower_return_type(output: &ReturnType) -> Option<AstNode> {
    match output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(lower_type(ty)),
    }
}

fn lower_fn_arg(arg: &FnArg) -> AstNode {
    match arg {
        FnArg::Receiver(r) => AstNode::new("Receiver")
            .with_scalar("reference", r.reference.is_some())
            .with_scalar_opt(
                "lifetime",
                r.reference
                    .as_ref()
                    .and_then(|(_, lifetime)| lifetime.as_ref())
                    .map(ToString::to_string),
            )
            .with_scalar("mutable", r.mutability.is_some()),
        FnArg::Typed(pt) => lower_pat_type(pt),
    }
}

fn lower_generics(generics: &Generics) -> AstNode {
    let predicates = generics
        .where_clause
        .iter()
        .flat_map(|wc| wc.predicates.iter())
        .map(|p| AstNode::new("WherePredicate").with_scalar("text", tokens_text(p)));
    AstNode::new("Generics")
        .with_children("params", generics.params.iter().map(lower_generic_param))
        .with_children("predicates", predicates)
}

fn lower_generic_param(param: &GenericParam) -> AstNode {
    match param {
        GenericParam::Type(t) => AstNode::new("TypeParam")
            .with_children("attrs", lower_attrs(&t.attrs))
            .with_scalar("ident", t.ident.to_string())
            .with_scalar_opt("bounds", non_empty(&tokens_text(&t.bounds)))
            .with_child_opt("default", t.default.as_ref().map(lower_type)),
        GenericParam::Lifetime(l) => AstNode::new("LifetimeParam")
            .with_children("attrs", lower_attrs(&l.attrs))
            .with_scalar("lifetime", l.lifetime.to_string())
            .with_scalar_opt("bounds", non_empty(&tokens_text(&l.bounds))),
        GenericParam::Const(c) => AstNode::new("ConstParam")
            .with_children("attrs", lower_attrs(&c.attrs))
            .with_scalar("ident", c.ident.to_string())
            .with_child("ty", lower_type(&c.ty))
            .with_child_opt("default", c.default.as_ref().map(lower_expr)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Statements and expressions
// ═══════════════════════════════════════════════════════════════════════════

fn lower_block(block: &Block) -> AstNode {
    AstNode::new("Block").with_children("stmts", block.stmts.iter().map(lower_stmt))
}

fn lower_stmt(stmt: &Stmt) -> AstNode {
    match stmt {
        Stmt::Local(local) => AstNode::new("Local")
            .with_children("attrs", lower_attrs(&local.attrs))
            .with_child("pat", lower_pat(&local.pat))
            .with_child_opt("init", local.init.as_ref().map(|init| lower_expr(&init.expr)))
            .with_child_opt(
                "diverge",
                local
                    .init
                    .as_ref()
                    .and_then(|init| init.diverge.as_ref())
                    .map(|(_, e)| lower_expr(e)),
            ),
        Stmt::Item(item) => lower_item(item),
        Stmt::Expr(expr, semi) => AstNode::new("StmtExpr")
            .with_children("attrs", lower_attrs(expr_attrs(expr)))
            .with_child("expr", lower_expr(expr))
            .with_scalar("semi", semi.is_some()),
        Stmt::Macro(m) => AstNode::new("StmtMacro")
            .with_children("attrs", lower_attrs(&m.attrs))
            .with_child("mac", lower_macro(&m.mac))
            .with_scalar("semi", m.semi_token.is_some()),
    }
}

fn lower_macro(mac: &Macro) -> AstNode {
    let delimiter = match mac.delimiter {
        MacroDelimiter::Paren(_) => "()",
        MacroDelimiter::Brace(_) => "{}",
        MacroDelimiter::Bracket(_) => "[]",
    };
    AstNode::new("Macro")
        .with_scalar("path", path_text(&mac.path))
        .with_scalar("delimiter", delimiter)
        .with_scalar_opt("tokens", non_empty(&mac.tokens.to_string()))
}

fn lower_expr(expr: &Expr) -> AstNode {
    match expr {
        Expr::Array(e) => AstNode::new("ExprArray").with_children("elems", e.elems.iter().map(lower_expr)),
        Expr::Assign(e) => AstNode::new("ExprAssign")
            .with_child("left", lower_expr(&e.left))
            .with_child("right", lower_expr(&e.right)),
        Expr::Async(e) => AstNode::new("ExprAsync")
            .with_scalar("move", e.capture.is_some())
            .with_child("block", lower_block(&e.block)),
        Expr::Await(e) => AstNode::new("ExprAwait").with_child("base", lower_expr(&e.base)),
        Expr::Binary(e) => AstNode::new("ExprBinary")
            .with_child("left", lower_expr(&e.left))
            .with_scalar("op", tokens_text(&e.op))
            .with_child("right", lower_expr(&e.right)),
        Expr::Block(e) => AstNode::new("ExprBlock")
            .with_scalar_opt("label", label_text(e.label.as_ref()))
            .with_child("block", lower_block(&e.block)),
        Expr::Break(e) => AstNode::new("ExprBreak")
            .with_scalar_opt("label", e.label.as_ref().map(ToString::to_string))
            .with_child_opt("expr", e.expr.as_deref().map(lower_expr)),
        Expr::Call(e) => AstNode::new("ExprCall")
            .with_child("func", lower_expr(&e.func))
            .with_children("args", e.args.iter().map(lower_expr)),
        Expr::Cast(e) => AstNode::new("ExprCast")
            .with_child("expr", lower_expr(&e.expr))
            .with_child("ty", lower_type(&e.ty)),
        Expr::Closure(e) => AstNode::new("ExprClosure")
            .with_scalar("async", e.asyncness.is_some())
            .with_scalar("move", e.capture.is_some())
            .with_children("inputs", e.inputs.iter().map(lower_pat))
            .with_child_opt("output", lower_return_type(&e.output))
            .with_child("body", lower_expr(&e.body)),
        Expr::Continue(e) => AstNode::new("ExprContinue")
            .with_scalar_opt("label", e.label.as_ref().map(ToString::to_string)),
        Expr::Field(e) => AstNode::new("ExprField")
            .with_child("base", lower_expr(&e.base))
            .with_scalar("member", member_text(&e.member)),
        Expr::ForLoop(e) => AstNode::new("ExprForLoop")
            .with_scalar_opt("label", label_text(e.label.as_ref()))
            .with_child("pat", lower_pat(&e.pat))
            .with_child("expr", lower_expr(&e.expr))
            .with_child("body", lower_block(&e.body)),
        Expr::Group(e) => lower_expr(&e.expr),
        Expr::If(e) => AstNode::new("ExprIf")
            .with_child("cond", lower_expr(&e.cond))
            .with_child("then_branch", lower_block(&e.then_branch))
            .with_child_opt(
                "else_branch",
                e.else_branch.as_ref().map(|(_, els)| lower_expr(els)),
            ),
        Expr::Index(e) => AstNode::new("ExprIndex")
            .with_child("expr", lower_expr(&e.expr))
            .with_child("index", lower_expr(&e.index)),
        Expr::Let(e) => AstNode::new("ExprLet")
            .with_child("pat", lower_pat(&e.pat))
            .with_child("expr", lower_expr(&e.expr)),
        Expr::Lit(e) => lower_lit(e),
        Expr::Loop(e) => AstNode::new("ExprLoop")
            .with_scalar_opt("label", label_text(e.label.as_ref()))
            .with_child("body", lower_block(&e.body)),
        Expr::Macro(e) => AstNode::new("ExprMacro").with_child("mac", lower_macro(&e.mac)),
        Expr::Match(e) => AstNode::new("ExprMatch")
            .with_child("expr", lower_expr(&e.expr))
            .with_children(
                "arms",
                e.arms.iter().map(|arm| {
                    AstNode::new("Arm")
                        .with_children("attrs", lower_attrs(&arm.attrs))
                        .with_child("pat", lower_pat(&arm.pat))
                        .with_child_opt("guard", arm.guard.as_ref().map(|(_, g)| lower_expr(g)))
                        .with_child("body", lower_expr(&arm.body))
                }),
            ),
        Expr::MethodCall(e) => AstNode::new("ExprMethodCall")
            .with_child("receiver", lower_expr(&e.receiver))
            .with_scalar("method", e.method.to_string())
            .with_scalar_opt("turbofish", e.turbofish.as_ref().map(|t| tokens_text(t)))
            .with_children("args", e.args.iter().map(lower_expr)),
        Expr::Paren(e) => AstNode::new("ExprParen").with_child("expr", lower_expr(&e.expr)),
        Expr::Path(e) => lower_expr_path(e),
        Expr::Range(e) => lower_expr_range(e),
        Expr::Reference(e) => AstNode::new("ExprReference")
            .with_scalar("mutable", e.mutability.is_some())
            .with_child("expr", lower_expr(&e.expr)),
        Expr::Repeat(e) => AstNode::new("ExprRepeat")
            .with_child("expr", lower_expr(&e.expr))
            .with_child("len", lower_expr(&e.len)),
        Expr::Return(e) => {
            AstNode::new("ExprReturn").with_child_opt("expr", e.expr.as_deref().map(lower_expr))
        }
        Expr::Struct(e) => AstNode::new("ExprStruct")
            .with_child("path", lower_path(&e.path))
            .with_children(
                "fields",
                e.fields.iter().map(|fv| {
                    AstNode::new("FieldValue")
                        .with_children("attrs", lower_attrs(&fv.attrs))
                        .with_scalar("member", member_text(&fv.member))
                        .with_child("expr", lower_expr(&fv.expr))
                }),
            )
            .with_child_opt("rest", e.rest.as_deref().map(lower_expr)),
        Expr::Try(e) => AstNode::new("ExprTry").with_child("expr", lower_expr(&e.expr)),
        Expr::Tuple(e) => AstNode::new("ExprTuple").with_children("elems", e.elems.iter().map(lower_expr)),
        Expr::Unary(e) => AstNode::new("ExprUnary")
            .with_scalar("op", tokens_text(&e.op))
            .with_child("expr", lower_expr(&e.expr)),
        Expr::Unsafe(e) => AstNode::new("ExprUnsafe").with_child("block", lower_block(&e.block)),
        Expr::While(e) => AstNode::new("ExprWhile")
            .with_scalar_opt("label", label_text(e.label.as_ref()))
            .with_child("cond", lower_expr(&e.cond))
            .with_child("body", lower_block(&e.body)),
        other => verbatim("Expr", other),
    }
}

/// Outer attributes of an expression, e.g. `#[allow(unused)] call();`.
fn expr_attrs(expr: &Expr) -> &[Attribute] {
    match expr {
        Expr::Array(e) => &e.attrs,
        Expr::Assign(e) => &e.attrs,
        Expr::Async(e) => &e.attrs,
        Expr::Await(e) => &e.attrs,
        Expr::Binary(e) => &e.attrs,
        Expr::Block(e) => &e.attrs,
        Expr::Break(e) => &e.attrs,
        Expr::Call(e) => &e.attrs,
        Expr::Cast(e) => &e.attrs,
        Expr::Closure(e) => &e.attrs,
        Expr::Continue(e) => &e.attrs,
        Expr::Field(e) => &e.attrs,
        Expr::ForLoop(e) => &e.attrs,
        Expr::If(e) => &e.attrs,
        Expr::Index(e) => &e.attrs,
        Expr::Let(e) => &e.attrs,
        Expr::Lit(e) => &e.attrs,
        Expr::Loop(e) => &e.attrs,
        Expr::Macro(e) => &e.attrs,
        Expr::Match(e) => &e.attrs,
        Expr::MethodCall(e) => &e.attrs,
        Expr::Paren(e) => &e.attrs,
        Expr::Path(e) => &e.attrs,
        Expr::Range(e) => &e.attrs,
        Expr::Reference(e) => &e.attrs,
        Expr::Repeat(e) => &e.attrs,
        Expr::Return(e) => &e.attrs,
        Expr::Struct(e) => &e.attrs,
        Expr::Try(e) => &e.attrs,
        Expr::Tuple(e) => &e.attrs,
        Expr::Unary(e) => &e.attrs,
        Expr::Unsafe(e) => &e.attrs,
        Expr::While(e) => &e.attrs,
        _ => &[],
    }
}

fn lower_lit(e: &ExprLit) -> AstNode {
    let (value, suffix): (ScalarValue, &str) = match &e.lit {
        Lit::Str(s) => (s.value().into(), s.suffix()),
        Lit::Char(c) => (c.value().into(), c.suffix()),
        Lit::Bool(b) => (b.value.into(), ""),
        Lit::Int(i) => {
            let value = i
                .base10_parse::<i64>()
                .map(ScalarValue::Int)
                .unwrap_or_else(|_| ScalarValue::Str(i.base10_digits().to_string()));
            (value, i.suffix())
        }
        Lit::Float(f) => (f.base10_digits().into(), f.suffix()),
        Lit::Byte(b) => (i64::from(b.value()).into(), b.suffix()),
        other => (tokens_text(other).into(), ""),
    };
    AstNode::new("ExprLit")
        .with_scalar("value", value)
        .with_scalar_opt("suffix", non_empty(suffix))
}

fn lower_expr_path(e: &ExprPath) -> AstNode {
    AstNode::new("ExprPath")
        .with_child_opt("qself", e.qself.as_ref().map(|q| lower_type(&q.ty)))
        .with_child("path", lower_path(&e.path))
}

fn lower_expr_range(e: &ExprRange) -> AstNode {
    let limits = match e.limits {
        RangeLimits::HalfOpen(_) => "..",
        RangeLimits::Closed(_) => "..=",
    };
    AstNode::new("ExprRange")
        .with_child_opt("start", e.start.as_deref().map(lower_expr))
        .with_scalar("limits", limits)
        .with_child_opt("end", e.end.as_deref().map(lower_expr))
}

// ═══════════════════════════════════════════════════════════════════════════
// Patterns, types and paths
// ═══════════════════════════════════════════════════════════════════════════

fn lower_pat(pat: &Pat) -> AstNode {
    match pat {
        Pat::Ident(p) => AstNode::new("PatIdent")
            .with_children("attrs", lower_attrs(&p.attrs))
            .with_scalar("ref", p.by_ref.is_some())
            .with_scalar("mutable", p.mutability.is_some())
            .with_scalar("ident", p.ident.to_string())
            .with_child_opt("subpat", p.subpat.as_ref().map(|(_, sub)| lower_pat(sub))),
        Pat::Lit(p) => lower_lit(p),
        Pat::Or(p) => AstNode::new("PatOr").with_children("cases", p.cases.iter().map(lower_pat)),
        Pat::Paren(p) => lower_pat(&p.pat),
        Pat::Path(p) => lower_expr_path(p),
        Pat::Range(p) => lower_expr_range(p),
        Pat::Reference(p) => AstNode::new("PatReference")
            .with_scalar("mutable", p.mutability.is_some())
            .with_child("pat", lower_pat(&p.pat)),
        Pat::Rest(_) => AstNode::new("PatRest"),
        Pat::Slice(p) => AstNode::new("PatSlice").with_children("elems", p.elems.iter().map(lower_pat)),
        Pat::Struct(p) => AstNode::new("PatStruct")
            .with_child("path", lower_path(&p.path))
            .with_children(
                "fields",
                p.fields.iter().map(|fp| {
                    AstNode::new("FieldPat")
                        .with_scalar("member", member_text(&fp.member))
                        .with_child("pat", lower_pat(&fp.pat))
                }),
            )
            .with_scalar("rest", p.rest.is_some()),
        Pat::Tuple(p) => AstNode::new("PatTuple").with_children("elems", p.elems.iter().map(lower_pat)),
        Pat::TupleStruct(p) => AstNode::new("PatTupleStruct")
            .with_child("path", lower_path(&p.path))
            .with_children("elems", p.elems.iter().map(lower_pat)),
        Pat::Type(p) => lower_pat_type(p),
        Pat::Wild(_) => AstNode::new("PatWild"),
        other => verbatim("Pat", other),
    }
}

fn lower_pat_type(pt: &PatType) -> AstNode {
    AstNode::new("PatType")
        .with_children("attrs", lower_attrs(&pt.attrs))
        .with_child("pat", lower_pat(&pt.pat))
        .with_child("ty", lower_type(&pt.ty))
}

fn lower_type(ty: &Type) -> AstNode {
    match ty {
        Type::Path(t) => AstNode::new("TypePath")
            .with_child_opt("qself", t.qself.as_ref().map(|q| lower_type(&q.ty)))
            .with_child("path", lower_path(&t.path)),
        Type::Reference(t) => AstNode::new("TypeReference")
            .with_scalar_opt("lifetime", t.lifetime.as_ref().map(ToString::to_string))
            .with_scalar("mutable", t.mutability.is_some())
            .with_child("elem", lower_type(&t.elem)),
        Type::Tuple(t) => AstNode::new("TypeTuple").with_children("elems", t.elems.iter().map(lower_type)),
        Type::Slice(t) => AstNode::new("TypeSlice").with_child("elem", lower_type(&t.elem)),
        Type::Array(t) => AstNode::new("TypeArray")
            .with_child("elem", lower_type(&t.elem))
            .with_child("len", lower_expr(&t.len)),
        Type::Ptr(t) => AstNode::new("TypePtr")
            .with_scalar("mutable", t.mutability.is_some())
            .with_child("elem", lower_type(&t.elem)),
        Type::ImplTrait(t) => {
            AstNode::new("TypeImplTrait").with_scalar("bounds", tokens_text(&t.bounds))
        }
        Type::TraitObject(t) => {
            AstNode::new("TypeTraitObject").with_scalar("bounds", tokens_text(&t.bounds))
        }
        Type::Never(_) => AstNode::new("TypeNever"),
        Type::Paren(t) => lower_type(&t.elem),
        Type::Group(t) => lower_type(&t.elem),
        other => verbatim("Type", other),
    }
}

fn lower_path(path: &syn::Path) -> AstNode {
    AstNode::new("Path")
        .with_scalar("global", path.leading_colon.is_some())
        .with_children(
            "segments",
            path.segments.iter().map(|segment| {
                let arguments = match &segment.arguments {
                    PathArguments::None => None,
                    args => Some(tokens_text(args)),
                };
                AstNode::new("PathSegment")
                    .with_scalar("ident", segment.ident.to_string())
                    .with_scalar_opt("arguments", arguments)
            }),
        )
}

// ═══════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Fallback for syntax without a dedicated node kind.
fn verbatim<T: ToTokens>(category: &'static str, node: &T) -> AstNode {
    let line = node.span().start().line;
    debug!(category, line, "No dedicated node kind; keeping token text");
    AstNode::new("Verbatim")
        .with_scalar("category", category)
        .with_scalar("tokens", tokens_text(node))
}

fn tokens_text<T: ToTokens + ?Sized>(node: &T) -> String {
    node.to_token_stream().to_string()
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn path_text(path: &syn::Path) -> String {
    let joined = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    match path.leading_colon {
        Some(_) => format!("::{}", joined),
        None => joined,
    }
}

fn vis_text(vis: &Visibility) -> Option<String> {
    match vis {
        Visibility::Public(_) => Some("pub".to_string()),
        Visibility::Restricted(r) => {
            let scope = if r.in_token.is_some() { "in " } else { "" };
            Some(format!("pub({}{})", scope, path_text(&r.path)))
        }
        Visibility::Inherited => None,
    }
}

fn label_text(label: Option<&Label>) -> Option<String> {
    label.map(|l| l.name.to_string())
}

fn member_text(member: &Member) -> String {
    match member {
        Member::Named(ident) => ident.to_string(),
        Member::Unnamed(index) => index.index.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::SlotValue;
    use crate::domain::schema::{SchemaRegistry, SlotKind};

    fn parse(src: &str) -> AstNode {
        SynAstParser.parse(src).unwrap()
    }

    fn child<'a>(node: &'a AstNode, id: &str) -> &'a AstNode {
        match node.slot(id) {
            Some(SlotValue::Child(c)) => c,
            other => panic!("no child `{}` on {}: {:?}", id, node.kind(), other),
        }
    }

    fn children<'a>(node: &'a AstNode, id: &str) -> &'a [AstNode] {
        match node.slot(id) {
            Some(SlotValue::Children(c)) => c,
            other => panic!("no list `{}` on {}: {:?}", id, node.kind(), other),
        }
    }

    fn scalar(node: &AstNode, id: &str) -> Option<ScalarValue> {
        match node.slot(id) {
            Some(SlotValue::Scalar(v)) => Some(v.clone()),
            _ => None,
        }
    }

    /// Walks the tree, failing on unknown kinds, undeclared slot ids, or values
    /// whose shape differs from the declared slot kind.
    fn assert_conforms(registry: &SchemaRegistry, node: &AstNode) {
        let schema = registry
            .schema(node.kind())
            .unwrap_or_else(|| panic!("unregistered kind {}", node.kind()));
        for id in node.slot_ids() {
            let descriptor = schema
                .slots()
                .iter()
                .find(|d| d.id == id)
                .unwrap_or_else(|| panic!("{} has undeclared slot `{}`", node.kind(), id));
            match (node.slot(id), descriptor.kind) {
                (Some(SlotValue::Scalar(_)), SlotKind::Scalar) => {}
                (Some(SlotValue::Child(c)), SlotKind::SingleChild) => assert_conforms(registry, c),
                (Some(SlotValue::Children(list)), SlotKind::ChildList { .. }) => {
                    list.iter().for_each(|c| assert_conforms(registry, c))
                }
                (value, kind) => panic!("{}.{}: {:?} stored for {:?}", node.kind(), id, value, kind),
            }
        }
    }

    const SAMPLE: &str = r#"
//! Crate docs.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
extern crate alloc as a;

/// A point.
#[derive(Debug, Clone)]
pub struct Point<T: Copy = i32> {
    /// Horizontal.
    pub x: T,
    y: T,
}

struct Unit;
struct Pair(u8, pub(crate) u16);

pub enum Shape { Circle { r: f64 }, Square(f64), Empty = 3 }

union Bits { i: u32, f: f32 }

pub trait Area: Clone + Send {
    const SIDES: usize;
    type Output: Copy;
    fn area(&self) -> f64;
    fn scale(&mut self, k: f64) { let _ = k; }
}

impl<T> Point<T> where T: Copy {
    pub const ORIGIN: i32 = 0;
    type Alias = T;
    pub fn new(x: T, y: T) -> Self { Self { x, y } }
}

impl !Send for Unit {}

static mut COUNT: u32 = 0;
const LIMIT: [u8; 4] = [0; 4];
type Map = HashMap<String, Vec<u8>>;
macro_rules! square { ($x:expr) => { $x * $x }; }
mod inner { pub(in crate::inner) fn hidden() {} }
mod outer;

pub async unsafe fn everything<'a, const N: usize>(items: &'a mut [i64; N], p: *const u8) -> Option<i64> {
    let mut total = 0i64;
    let Some(first) = items.first() else { return None; };
    'outer: for (i, v) in items.iter().enumerate() {
        if i == 0 && *v > 1 { continue 'outer; } else if let 1..=3 = *v { break; }
        total += v * 2;
    }
    while total > 100 { total -= 1; }
    let closure = move |a: i64, _| -> i64 { a + 1 };
    let s = Shape::Circle { r: 1.5 };
    match s {
        Shape::Circle { r } if r > 0.0 => println!("{}", r),
        Shape::Square(ref side) | Shape::Square(side @ _) => {}
        _ => (),
    }
    let t = (1, 'c', "str", true, b'x', 2.5f32);
    let idx = LIMIT[0] as usize;
    let r = &mut total;
    *r = -*r;
    let v: Vec<_> = (0..10).map(|x| x * 2).collect::<Vec<_>>();
    let fut = async move { 1 };
    let _ = fut.await;
    let y = unsafe { *p };
    let arr = [first, &total];
    let q = <Vec<u8> as Default>::default();
    let res: Result<u8, ()> = Ok(1);
    let n = res?;
    loop { break; }
    let _ = (closure, t, idx, v, y, arr, q, n, square!(2), first.checked_add(1), point().x);
    Some(total)
}

fn never() -> ! { panic!() }
fn dynamic(f: Box<dyn Fn() + Send>, g: impl Iterator<Item = u8>) -> (u8, u16) { todo!() }
"#;

    #[test]
    fn test_every_lowered_kind_is_registered() {
        let root = parse(SAMPLE);
        assert_conforms(&SchemaRegistry::rust(), &root);
    }

    #[test]
    fn test_doc_comments_become_doc_child() {
        let root = parse(SAMPLE);
        let file_doc = child(&root, "doc");
        assert_eq!(file_doc.kind(), DOC_COMMENT_KIND);
        assert_eq!(scalar(file_doc, "style"), Some(ScalarValue::from("inner")));

        let point = &children(&root, "items")[2];
        assert_eq!(point.kind(), "ItemStruct");
        let doc = child(point, "doc");
        let lines = children(doc, "lines");
        assert_eq!(scalar(&lines[0], "text"), Some(ScalarValue::from("A point.")));

        // the derive stays an ordinary attribute
        let attrs = children(point, "attrs");
        assert_eq!(attrs.len(), 1);
        assert_eq!(scalar(&attrs[0], "path"), Some(ScalarValue::from("derive")));
        let args = scalar(&attrs[0], "args").unwrap().to_string();
        assert!(args.contains("Debug") && args.contains("Clone"));
    }

    fn any_scalar_contains(node: &AstNode, needle: &str) -> bool {
        node.slot_ids().any(|id| match node.slot(id) {
            Some(SlotValue::Scalar(v)) => v.to_string().contains(needle),
            Some(SlotValue::Child(c)) => any_scalar_contains(c, needle),
            Some(SlotValue::Children(list)) => list.iter().any(|c| any_scalar_contains(c, needle)),
            None => false,
        })
    }

    #[test]
    fn test_doc_comments_without_doc_slot_are_dropped() {
        let root = parse(
            "fn f</// PARAM_DOC\n T>() {\n\
             /// LET_DOC\n let x = 1;\n\
             match x {\n /// ARM_DOC\n _ => {}\n }\n}\n",
        );

        for text in ["PARAM_DOC", "LET_DOC", "ARM_DOC"] {
            assert!(!any_scalar_contains(&root, text), "{} leaked into the tree", text);
        }

        let item = &children(&root, "items")[0];
        let param = &children(child(child(item, "sig"), "generics"), "params")[0];
        assert_eq!(param.kind(), "TypeParam");
        assert!(children(param, "attrs").is_empty());

        let stmts = children(child(item, "block"), "stmts");
        assert_eq!(stmts[0].kind(), "Local");
        assert!(children(&stmts[0], "attrs").is_empty());
        assert_conforms(&SchemaRegistry::rust(), &root);
    }

    #[test]
    fn test_ordinary_attrs_survive_next_to_doc_comments() {
        let root = parse("fn f() {\n /// Note.\n #[allow(unused)]\n let x = 1;\n}\n");
        let stmts = children(child(&children(&root, "items")[0], "block"), "stmts");
        let attrs = children(&stmts[0], "attrs");
        assert_eq!(attrs.len(), 1);
        assert_eq!(scalar(&attrs[0], "path"), Some(ScalarValue::from("allow")));
    }

    #[test]
    fn test_statement_expression_attrs_are_kept() {
        let root = parse("fn f() { #[allow(unused_must_use)] g(); h(); }");
        let stmts = children(child(&children(&root, "items")[0], "block"), "stmts");

        assert_eq!(stmts[0].kind(), "StmtExpr");
        let attrs = children(&stmts[0], "attrs");
        assert_eq!(attrs.len(), 1);
        assert_eq!(scalar(&attrs[0], "path"), Some(ScalarValue::from("allow")));
        assert!(children(&stmts[1], "attrs").is_empty());
    }

    #[test]
    fn test_undocumented_items_have_no_doc_child() {
        let root = parse("fn plain() {}");
        let item = &children(&root, "items")[0];
        assert!(item.slot("doc").is_none());
        assert!(children(item, "attrs").is_empty());
    }

    #[test]
    fn test_optional_scalars_are_absent() {
        let root = parse("struct Pair(u8, pub(crate) u16);");
        let item = &children(&root, "items")[0];
        assert!(item.slot("vis").is_none());
        assert_eq!(scalar(item, "style"), Some(ScalarValue::from("tuple")));

        let fields = children(item, "fields");
        assert!(fields[0].slot("ident").is_none());
        assert!(fields[0].slot("vis").is_none());
        assert_eq!(scalar(&fields[1], "vis"), Some(ScalarValue::from("pub(crate)")));
    }

    #[test]
    fn test_signature_flags_and_output() {
        let root = parse("impl S { pub async fn go(&mut self, n: u32) -> bool { true } }");
        let method = &children(&children(&root, "items")[0], "items")[0];
        assert_eq!(method.kind(), "ImplItemFn");
        let sig = child(method, "sig");

        assert_eq!(scalar(sig, "async"), Some(ScalarValue::Bool(true)));
        assert_eq!(scalar(sig, "const"), Some(ScalarValue::Bool(false)));
        assert_eq!(scalar(sig, "ident"), Some(ScalarValue::from("go")));

        let inputs = children(sig, "inputs");
        assert_eq!(inputs[0].kind(), "Receiver");
        assert_eq!(scalar(&inputs[0], "mutable"), Some(ScalarValue::Bool(true)));
        assert_eq!(inputs[1].kind(), "PatType");
        assert_eq!(child(sig, "output").kind(), "TypePath");
    }

    #[test]
    fn test_literals_keep_runtime_types() {
        let root = parse("const X: () = (7u8, true, 'c', \"s\", 1.5);");
        let tuple = child(&children(&root, "items")[0], "expr");
        let elems = children(tuple, "elems");

        assert_eq!(scalar(&elems[0], "value"), Some(ScalarValue::Int(7)));
        assert_eq!(scalar(&elems[0], "suffix"), Some(ScalarValue::from("u8")));
        assert_eq!(scalar(&elems[1], "value"), Some(ScalarValue::Bool(true)));
        assert_eq!(scalar(&elems[2], "value"), Some(ScalarValue::Char('c')));
        assert_eq!(scalar(&elems[3], "value"), Some(ScalarValue::from("s")));
        assert!(elems[3].slot("suffix").is_none());
        assert_eq!(scalar(&elems[4], "value"), Some(ScalarValue::from("1.5")));
    }

    #[test]
    fn test_statement_order_is_kept() {
        let root = parse("fn f() { let a = 1; g(a); h(); }");
        let block = child(&children(&root, "items")[0], "block");
        let kinds: Vec<&str> = children(block, "stmts").iter().map(AstNode::kind).collect();
        assert_eq!(kinds, vec!["Local", "StmtExpr", "StmtExpr"]);
    }

    #[test]
    fn test_unsupported_syntax_is_verbatim() {
        let root = parse("extern \"C\" { fn abs(x: i32) -> i32; }");
        let item = &children(&root, "items")[0];
        assert_eq!(item.kind(), "Verbatim");
        assert_eq!(scalar(item, "category"), Some(ScalarValue::from("Item")));
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = SynAstParser
            .parse("fn ok() {}\nfn broken() { let = 1; }\n")
            .unwrap_err();
        match err {
            ViewerError::Parse { line, column, .. } => {
                assert_eq!(line, 2);
                assert!(column > 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
