// Node kind schemas for Rust source lowered by `SynAstParser`.
// Slot order here is the order slots appear in the rendered outline.

use crate::domain::schema::{NodeSchema, SchemaRegistry, DOC_COMMENT_KIND};

/// Kinds that carry attributes and an optional doc comment.
fn documented(kind: &'static str) -> NodeSchema {
    NodeSchema::new(kind)
        .list("attrs", "Attribute")
        .child("doc", DOC_COMMENT_KIND)
}

fn attributed(kind: &'static str) -> NodeSchema {
    NodeSchema::new(kind).list("attrs", "Attribute")
}

impl SchemaRegistry {
    /// Registry covering every kind produced by the syn lowering.
    pub fn rust() -> Self {
        let mut registry = SchemaRegistry::new();
        for schema in file_and_attributes()
            .into_iter()
            .chain(items())
            .chain(signatures())
            .chain(statements())
            .chain(expressions())
            .chain(patterns())
            .chain(types())
        {
            registry.register(schema);
        }
        registry
    }
}

fn file_and_attributes() -> Vec<NodeSchema> {
    vec![
        NodeSchema::new("File")
            .scalar("shebang", "String")
            .list("attrs", "Attribute")
            .child("doc", DOC_COMMENT_KIND)
            .list("items", "Item"),
        NodeSchema::new(DOC_COMMENT_KIND)
            .scalar("style", "String")
            .list("lines", "DocLine"),
        NodeSchema::new("DocLine").scalar("text", "String"),
        NodeSchema::new("Attribute")
            .scalar("style", "String")
            .scalar("path", "String")
            .scalar("args", "String"),
        NodeSchema::new("Macro")
            .scalar("path", "String")
            .scalar("delimiter", "String")
            .scalar("tokens", "String"),
        NodeSchema::new("Verbatim")
            .scalar("category", "String")
            .scalar("tokens", "String"),
    ]
}

fn items() -> Vec<NodeSchema> {
    vec![
        documented("ItemFn")
            .scalar("vis", "String")
            .child("sig", "Signature")
            .child("block", "Block"),
        documented("ItemStruct")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .child("generics", "Generics")
            .scalar("style", "String")
            .list("fields", "Field"),
        documented("ItemEnum")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .child("generics", "Generics")
            .list("variants", "Variant"),
        documented("ItemUnion")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .child("generics", "Generics")
            .list("fields", "Field"),
        documented("Field")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .child("ty", "Type"),
        documented("Variant")
            .scalar("ident", "String")
            .scalar("style", "String")
            .list("fields", "Field")
            .child("discriminant", "Expr"),
        documented("ItemImpl")
            .flag("unsafe")
            .child("generics", "Generics")
            .flag("negative")
            .child("trait", "Path")
            .child("self_ty", "Type")
            .list("items", "ImplItem"),
        documented("ImplItemFn")
            .scalar("vis", "String")
            .child("sig", "Signature")
            .child("block", "Block"),
        documented("ImplItemConst")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .child("ty", "Type")
            .child("expr", "Expr"),
        documented("ImplItemType")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .child("generics", "Generics")
            .child("ty", "Type"),
        documented("ItemTrait")
            .scalar("vis", "String")
            .flag("unsafe")
            .flag("auto")
            .scalar("ident", "String")
            .child("generics", "Generics")
            .scalar("supertraits", "String")
            .list("items", "TraitItem"),
        documented("TraitItemFn")
            .child("sig", "Signature")
            .child("default", "Block"),
        documented("TraitItemConst")
            .scalar("ident", "String")
            .child("ty", "Type")
            .child("default", "Expr"),
        documented("TraitItemType")
            .scalar("ident", "String")
            .scalar("bounds", "String")
            .child("default", "Type"),
        documented("ItemMod")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .flag("inline")
            .list("items", "Item"),
        documented("ItemUse")
            .scalar("vis", "String")
            .scalar("tree", "String"),
        documented("ItemConst")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .child("ty", "Type")
            .child("expr", "Expr"),
        documented("ItemStatic")
            .scalar("vis", "String")
            .flag("mutable")
            .scalar("ident", "String")
            .child("ty", "Type")
            .child("expr", "Expr"),
        documented("ItemType")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .child("generics", "Generics")
            .child("ty", "Type"),
        documented("ItemMacro")
            .scalar("ident", "String")
            .child("mac", "Macro"),
        documented("ItemExternCrate")
            .scalar("vis", "String")
            .scalar("ident", "String")
            .scalar("rename", "String"),
    ]
}

fn signatures() -> Vec<NodeSchema> {
    vec![
        NodeSchema::new("Signature")
            .flag("const")
            .flag("async")
            .flag("unsafe")
            .scalar("abi", "String")
            .scalar("ident", "String")
            .child("generics", "Generics")
            .list("inputs", "FnArg")
            .flag("variadic")
            .child("output", "Type"),
        NodeSchema::new("Receiver")
            .flag("reference")
            .scalar("lifetime", "String")
            .flag("mutable"),
        NodeSchema::new("Generics")
            .list("params", "GenericParam")
            .list("predicates", "WherePredicate"),
        attributed("TypeParam")
            .scalar("ident", "String")
            .scalar("bounds", "String")
            .child("default", "Type"),
        attributed("LifetimeParam")
            .scalar("lifetime", "String")
            .scalar("bounds", "String"),
        attributed("ConstParam")
            .scalar("ident", "String")
            .child("ty", "Type")
            .child("default", "Expr"),
        NodeSchema::new("WherePredicate").scalar("text", "String"),
    ]
}

fn statements() -> Vec<NodeSchema> {
    vec![
        NodeSchema::new("Block").list("stmts", "Stmt"),
        attributed("Local")
            .child("pat", "Pat")
            .child("init", "Expr")
            .child("diverge", "Expr"),
        attributed("StmtExpr").child("expr", "Expr").flag("semi"),
        attributed("StmtMacro").child("mac", "Macro").flag("semi"),
    ]
}

fn expressions() -> Vec<NodeSchema> {
    vec![
        NodeSchema::new("ExprArray").list("elems", "Expr"),
        NodeSchema::new("ExprAssign")
            .child("left", "Expr")
            .child("right", "Expr"),
        NodeSchema::new("ExprAsync").flag("move").child("block", "Block"),
        NodeSchema::new("ExprAwait").child("base", "Expr"),
        NodeSchema::new("ExprBinary")
            .child("left", "Expr")
            .scalar("op", "String")
            .child("right", "Expr"),
        NodeSchema::new("ExprBlock")
            .scalar("label", "String")
            .child("block", "Block"),
        NodeSchema::new("ExprBreak")
            .scalar("label", "String")
            .child("expr", "Expr"),
        NodeSchema::new("ExprCall")
            .child("func", "Expr")
            .list("args", "Expr"),
        NodeSchema::new("ExprCast").child("expr", "Expr").child("ty", "Type"),
        NodeSchema::new("ExprClosure")
            .flag("async")
            .flag("move")
            .list("inputs", "Pat")
            .child("output", "Type")
            .child("body", "Expr"),
        NodeSchema::new("ExprContinue").scalar("label", "String"),
        NodeSchema::new("ExprField")
            .child("base", "Expr")
            .scalar("member", "String"),
        NodeSchema::new("ExprForLoop")
            .scalar("label", "String")
            .child("pat", "Pat")
            .child("expr", "Expr")
            .child("body", "Block"),
        NodeSchema::new("ExprIf")
            .child("cond", "Expr")
            .child("then_branch", "Block")
            .child("else_branch", "Expr"),
        NodeSchema::new("ExprIndex")
            .child("expr", "Expr")
            .child("index", "Expr"),
        NodeSchema::new("ExprLet").child("pat", "Pat").child("expr", "Expr"),
        NodeSchema::new("ExprLit")
            .scalar("value", "Object")
            .scalar("suffix", "String"),
        NodeSchema::new("ExprLoop")
            .scalar("label", "String")
            .child("body", "Block"),
        NodeSchema::new("ExprMacro").child("mac", "Macro"),
        NodeSchema::new("ExprMatch")
            .child("expr", "Expr")
            .list("arms", "Arm"),
        attributed("Arm")
            .child("pat", "Pat")
            .child("guard", "Expr")
            .child("body", "Expr"),
        NodeSchema::new("ExprMethodCall")
            .child("receiver", "Expr")
            .scalar("method", "String")
            .scalar("turbofish", "String")
            .list("args", "Expr"),
        NodeSchema::new("ExprParen").child("expr", "Expr"),
        NodeSchema::new("ExprPath")
            .child("qself", "Type")
            .child("path", "Path"),
        NodeSchema::new("ExprRange")
            .child("start", "Expr")
            .scalar("limits", "String")
            .child("end", "Expr"),
        NodeSchema::new("ExprReference")
            .flag("mutable")
            .child("expr", "Expr"),
        NodeSchema::new("ExprRepeat")
            .child("expr", "Expr")
            .child("len", "Expr"),
        NodeSchema::new("ExprReturn").child("expr", "Expr"),
        NodeSchema::new("ExprStruct")
            .child("path", "Path")
            .list("fields", "FieldValue")
            .child("rest", "Expr"),
        attributed("FieldValue")
            .scalar("member", "String")
            .child("expr", "Expr"),
        NodeSchema::new("ExprTry").child("expr", "Expr"),
        NodeSchema::new("ExprTuple").list("elems", "Expr"),
        NodeSchema::new("ExprUnary")
            .scalar("op", "String")
            .child("expr", "Expr"),
        NodeSchema::new("ExprUnsafe").child("block", "Block"),
        NodeSchema::new("ExprWhile")
            .scalar("label", "String")
            .child("cond", "Expr")
            .child("body", "Block"),
    ]
}

fn patterns() -> Vec<NodeSchema> {
    vec![
        attributed("PatIdent")
            .flag("ref")
            .flag("mutable")
            .scalar("ident", "String")
            .child("subpat", "Pat"),
        attributed("PatType").child("pat", "Pat").child("ty", "Type"),
        NodeSchema::new("PatOr").list("cases", "Pat"),
        NodeSchema::new("PatReference")
            .flag("mutable")
            .child("pat", "Pat"),
        NodeSchema::new("PatRest"),
        NodeSchema::new("PatSlice").list("elems", "Pat"),
        NodeSchema::new("PatStruct")
            .child("path", "Path")
            .list("fields", "FieldPat")
            .flag("rest"),
        NodeSchema::new("FieldPat")
            .scalar("member", "String")
            .child("pat", "Pat"),
        NodeSchema::new("PatTuple").list("elems", "Pat"),
        NodeSchema::new("PatTupleStruct")
            .child("path", "Path")
            .list("elems", "Pat"),
        NodeSchema::new("PatWild"),
    ]
}

fn types() -> Vec<NodeSchema> {
    vec![
        NodeSchema::new("Path")
            .flag("global")
            .list("segments", "PathSegment"),
        NodeSchema::new("PathSegment")
            .scalar("ident", "String")
            .scalar("arguments", "String"),
        NodeSchema::new("TypePath")
            .child("qself", "Type")
            .child("path", "Path"),
        NodeSchema::new("TypeReference")
            .scalar("lifetime", "String")
            .flag("mutable")
            .child("elem", "Type"),
        NodeSchema::new("TypeTuple").list("elems", "Type"),
        NodeSchema::new("TypeSlice").child("elem", "Type"),
        NodeSchema::new("TypeArray")
            .child("elem", "Type")
            .child("len", "Expr"),
        NodeSchema::new("TypePtr").flag("mutable").child("elem", "Type"),
        NodeSchema::new("TypeImplTrait").scalar("bounds", "String"),
        NodeSchema::new("TypeTraitObject").scalar("bounds", "String"),
        NodeSchema::new("TypeNever"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::AstNode;
    use crate::domain::schema::SlotKind;

    #[test]
    fn test_documentable_kinds_declare_doc_slot() {
        let registry = SchemaRegistry::rust();
        for kind in ["File", "ItemFn", "ItemStruct", "Field", "Variant", "ImplItemFn", "TraitItemFn"] {
            let schema = registry.schema(kind).unwrap();
            assert_eq!(schema.return_type_of("getDoc"), Some(DOC_COMMENT_KIND), "{}", kind);
        }
    }

    #[test]
    fn test_every_list_element_kind_is_named() {
        let registry = SchemaRegistry::rust();
        let list = registry
            .slots_of(&AstNode::new("Block"))
            .iter()
            .find(|d| d.id == "stmts")
            .unwrap();
        assert_eq!(list.kind, SlotKind::ChildList { element_kind: "Stmt" });
    }

    #[test]
    fn test_leaf_kinds_have_no_slots() {
        let registry = SchemaRegistry::rust();
        assert!(registry.slots_of(&AstNode::new("PatWild")).is_empty());
        assert!(registry.slots_of(&AstNode::new("TypeNever")).is_empty());
    }
}
