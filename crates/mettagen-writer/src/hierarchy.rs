//! Type-hierarchy extraction from the ontology graph.

use crate::decl::TypeDecl;
use mettagen_atom::normalize_label;
use mettagen_ontology::{OntologyGraph, ANCESTOR_DEPTH_LIMIT};

/// One type declaration per non-mixin class, in class enumeration order.
///
/// The ancestor of a class is the *last* node of the depth-limited preorder
/// walk starting at it. The depth bound means a class whose root sits more
/// than [`ANCESTOR_DEPTH_LIMIT`] hops away is declared under an intermediate
/// class; that truncation is part of the output contract and pinned by tests.
pub fn type_hierarchy(graph: &OntologyGraph) -> Vec<TypeDecl> {
    let mut decls = Vec::new();
    for class in graph.classes() {
        if OntologyGraph::is_mixin(class) {
            continue;
        }
        let walk = graph.preorder(class, ANCESTOR_DEPTH_LIMIT);
        let ancestor = walk.last().copied().unwrap_or(class);

        let name = normalize_label(class);
        let ancestor = normalize_label(ancestor);
        if ancestor == name {
            decls.push(TypeDecl::Root {
                name: name.to_uppercase(),
            });
        } else {
            decls.push(TypeDecl::Sub {
                name: name.to_uppercase(),
                parent: ancestor.to_uppercase(),
            });
        }
    }
    decls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> OntologyGraph {
        let mut g = OntologyGraph::new();
        g.add_class("entity");
        g.add_subclass("biological entity", "entity");
        g.add_subclass("gene", "biological entity");
        g.add_class("gene or gene product mixin");
        g
    }

    #[test]
    fn one_declaration_per_non_mixin_class() {
        let decls = type_hierarchy(&sample_graph());
        assert_eq!(decls.len(), 3);
    }

    #[test]
    fn mixins_produce_no_declaration() {
        let decls = type_hierarchy(&sample_graph());
        assert!(!decls
            .iter()
            .any(|d| d.to_string().contains("MIXIN")));
    }

    #[test]
    fn parentless_class_is_a_root_type() {
        let decls = type_hierarchy(&sample_graph());
        assert_eq!(decls[0].to_string(), "(: ENTITY Type)");
    }

    #[test]
    fn subclass_declares_its_walk_ancestor() {
        let decls = type_hierarchy(&sample_graph());
        assert_eq!(decls[1].to_string(), "(<: BIOLOGICAL_ENTITY ENTITY)");
        // "gene" reaches "entity" within two hops, so it is declared under
        // the chain's end rather than its direct parent.
        assert_eq!(decls[2].to_string(), "(<: GENE ENTITY)");
    }

    #[test]
    fn deep_chain_is_truncated_at_the_depth_bound() {
        let mut g = OntologyGraph::new();
        g.add_subclass("gene", "biological entity");
        g.add_subclass("biological entity", "named thing");
        g.add_subclass("named thing", "entity");
        let decls = type_hierarchy(&g);
        // The true root ("entity") is three hops from "gene"; the bounded
        // walk stops at "named thing" and that is what gets declared.
        assert_eq!(decls[0].to_string(), "(<: GENE NAMED_THING)");
    }

    #[test]
    fn self_loop_class_is_declared_root() {
        let mut g = OntologyGraph::new();
        g.add_subclass("thing", "thing");
        let decls = type_hierarchy(&g);
        assert_eq!(decls[0].to_string(), "(: THING Type)");
    }

    #[test]
    fn rerun_is_byte_identical() {
        let g = sample_graph();
        let a: Vec<String> = type_hierarchy(&g).iter().map(|d| d.to_string()).collect();
        let b: Vec<String> = type_hierarchy(&g).iter().map(|d| d.to_string()).collect();
        assert_eq!(a, b);
    }
}
