use super::*;

const OBO: &str = "http://purl.obolibrary.org/obo/";

fn triple(subject: &str, predicate: &str, object: &str) -> Triple {
    Triple {
        subject: subject.to_string(),
        predicate: predicate.to_string(),
        object: object.to_string(),
    }
}

fn obo(local: &str) -> String {
    format!("{OBO}{local}")
}

fn builder() -> GraphBuilder<BaseIriNamespace> {
    GraphBuilder::new(BaseIriNamespace::new(OBO))
}

#[test]
fn admits_only_permitted_predicates_inside_namespace() {
    let triples = vec![
        triple(&obo("ENVO_1"), RDFS_SUB_CLASS_OF, &obo("ENVO_0")),
        triple(&obo("ENVO_1"), RDFS_LABEL, "lake"),
        triple(&obo("ENVO_1"), OBO_IN_OWL_ID, "ENVO:1"),
        triple(
            &obo("ENVO_1"),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
            "http://www.w3.org/2002/07/owl#Class",
        ),
        triple("http://example.org/a", RDFS_LABEL, "outside"),
    ];
    let graph = builder().build(&triples);

    assert_eq!(graph.edge_count(), 3);
    assert!(graph.contains(&obo("ENVO_0")));
    assert!(graph.contains("lake"));
    assert!(!graph.contains("http://example.org/a"));
    assert!(!graph.contains("http://www.w3.org/2002/07/owl#Class"));

    let roles: Vec<(&str, EdgeRole)> = graph.successors(&obo("ENVO_1")).collect();
    assert!(roles.contains(&(obo("ENVO_0").as_str(), EdgeRole::SubClassOf)));
    assert!(roles.contains(&("lake", EdgeRole::Label)));
    assert!(roles.contains(&("ENVO:1", EdgeRole::Identifier)));
}

#[test]
fn object_in_namespace_is_enough_for_admission() {
    let triples = vec![triple(
        "http://example.org/Thing",
        RDFS_SUB_CLASS_OF,
        &obo("BFO_0000001"),
    )];
    let graph = builder().build(&triples);
    assert_eq!(graph.edge_count(), 1);
    let preds: Vec<&str> = graph
        .predecessors(&obo("BFO_0000001"))
        .map(|(node, _)| node)
        .collect();
    assert_eq!(preds, ["http://example.org/Thing"]);
}

#[test]
fn anonymous_nodes_and_their_edges_are_removed() {
    let anon = format!("N{}", "0123456789abcdef0123456789abcdef");
    let triples = vec![
        triple(&obo("ENVO_2"), RDFS_SUB_CLASS_OF, &anon),
        triple(&anon, RDFS_SUB_CLASS_OF, &obo("ENVO_1")),
        triple(&obo("ENVO_2"), RDFS_LABEL, "river"),
    ];
    let graph = builder().build(&triples);

    assert!(!graph.contains(&anon));
    assert!(graph.nodes().all(|node| !builder().is_anonymous(node)));
    assert_eq!(graph.successors(&obo("ENVO_2")).count(), 1);
    assert_eq!(graph.predecessors(&obo("ENVO_1")).count(), 0);
}

#[test]
fn label_shaped_like_a_blank_node_is_removed() {
    // 33 characters starting with "N": indistinguishable from a blank node.
    let label = format!("N{}", "orthern hemisphere temperate lak");
    assert_eq!(label.len(), 33);
    let triples = vec![
        triple(&obo("X_2"), RDFS_SUB_CLASS_OF, &obo("X_1")),
        triple(&obo("X_2"), RDFS_LABEL, &label),
        triple(&obo("X_3"), RDFS_SUB_CLASS_OF, &obo("X_1")),
        triple(&obo("X_3"), RDFS_LABEL, "pond"),
    ];
    let graph = builder().build(&triples);

    assert!(!graph.contains(&label));
    let roles: Vec<EdgeRole> = graph.successors(&obo("X_2")).map(|(_, role)| role).collect();
    assert_eq!(roles, [EdgeRole::SubClassOf]);
    let records = crate::closure::extract_closure(&graph, &obo("X_1")).expect("closure");
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["X:3"]);
}

#[test]
fn anonymous_pattern_requires_exact_length() {
    let builder = builder();
    assert!(builder.is_anonymous(&format!("N{}", "a".repeat(32))));
    assert!(!builder.is_anonymous(&format!("N{}", "a".repeat(31))));
    assert!(!builder.is_anonymous(&format!("N{}", "a".repeat(33))));
    assert!(!builder.is_anonymous(&format!("M{}", "a".repeat(32))));
}

#[test]
fn repeated_edge_keeps_latest_role() {
    let triples = vec![
        triple(&obo("X_1"), RDFS_LABEL, &obo("X_2")),
        triple(&obo("X_1"), RDFS_SUB_CLASS_OF, &obo("X_2")),
    ];
    let graph = builder().build(&triples);
    let roles: Vec<EdgeRole> = graph.successors(&obo("X_1")).map(|(_, role)| role).collect();
    assert_eq!(roles, [EdgeRole::SubClassOf]);
}

#[test]
fn closure_namespace_predicate_is_accepted() {
    let triples = vec![
        triple("urn:vocab:a", RDFS_SUB_CLASS_OF, "urn:vocab:b"),
        triple(&obo("ENVO_1"), RDFS_SUB_CLASS_OF, &obo("ENVO_0")),
    ];
    let graph = GraphBuilder::new(|node: &str| node.starts_with("urn:vocab:")).build(&triples);
    assert!(graph.contains("urn:vocab:a"));
    assert!(!graph.contains(&obo("ENVO_1")));
}

#[test]
fn load_rdf_xml_renders_literals_and_blank_nodes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("mini.owl");
    std::fs::write(
        &path,
        r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://purl.obolibrary.org/obo/ENVO_2">
    <rdfs:label>river</rdfs:label>
    <rdfs:subClassOf>
      <owl:Restriction>
        <owl:someValuesFrom rdf:resource="http://purl.obolibrary.org/obo/ENVO_1"/>
      </owl:Restriction>
    </rdfs:subClassOf>
  </owl:Class>
</rdf:RDF>
"#,
    )
    .expect("write ontology");

    let triples = load_rdf_xml(&path).expect("parse ontology");
    assert!(triples.iter().any(|t| t.subject == obo("ENVO_2")
        && t.predicate == RDFS_LABEL
        && t.object == "river"));

    let restriction = triples
        .iter()
        .find(|t| t.subject == obo("ENVO_2") && t.predicate == RDFS_SUB_CLASS_OF)
        .expect("subclass triple");
    assert!(builder().is_anonymous(&restriction.object));

    let graph = builder().build(&triples);
    assert!(!graph.contains(&restriction.object));
    assert!(graph.contains("river"));
}

#[test]
fn load_rdf_xml_propagates_parse_errors() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.owl");
    std::fs::write(
        &path,
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <undeclared:Thing rdf:about="http://purl.obolibrary.org/obo/X_1"/>
</rdf:RDF>
"#,
    )
    .expect("write ontology");
    let err = load_rdf_xml(&path).expect_err("unbound prefix");
    assert!(err.to_string().contains("broken.owl"));
}
