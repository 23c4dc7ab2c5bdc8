use vitae_core::{
    ContainerKind, EditingSession, ProfileDocument, RemovalChoice, TextField,
    MUTATION_SETTLE_MS,
};

fn session_with_nested_project() -> (EditingSession, vitae_core::NodeId) {
    let mut session = EditingSession::new(ProfileDocument::new());
    let company = session.add_company();
    session
        .set_text(company, TextField::Name, "Acme")
        .expect("company name slot should exist");
    let project = session
        .add_project(company)
        .expect("company should accept a project");
    (session, project)
}

#[test]
fn submitted_paths_follow_the_nested_bracket_grammar() {
    let (mut session, project) = session_with_nested_project();
    let tech_group = session
        .document()
        .find_node(project)
        .expect("project should exist")
        .container(ContainerKind::MetaItems)
        .expect("project should own meta items")
        .nodes[2]
        .node_id;
    let tech = session
        .document()
        .find_node(tech_group)
        .expect("tech group should exist")
        .container(ContainerKind::TechStacks)
        .expect("tech group should own stacks")
        .nodes[0]
        .node_id;
    session
        .set_text(tech, TextField::TechName, "Rust")
        .expect("tech name slot should exist");

    let fields = session.submit();
    assert_eq!(
        fields
            .get("companies[0].projects[0].metaItems[2].techStacks[0].techName")
            .map(String::as_str),
        Some("Rust")
    );
    assert_eq!(
        fields
            .get("companies[0].projects[0].metaItems[2].itemType")
            .map(String::as_str),
        Some("TECH_STACK_GROUP")
    );
    assert!(fields.contains_key("companies[0].projects[0].metaItems[3].problems[0].solutions[0].content"));
    assert!(fields.contains_key("companies[0].projects[0].metaItems[3].problems[0].impacts[0].content"));
}

#[test]
fn renumbering_is_stable_when_structure_is_unchanged() {
    let (mut session, _) = session_with_nested_project();
    let first = session.submit();
    let second = session.submit();
    assert_eq!(first, second);
}

#[test]
fn removal_closes_index_gaps_before_submission() {
    let mut session = EditingSession::new(ProfileDocument::new());
    let _a = session.add_company();
    let b = session.add_company();
    let _c = session.add_company();
    session.advance(MUTATION_SETTLE_MS);

    assert!(session.remove_node(b, RemovalChoice::Confirm));

    // No settle window has elapsed, yet submission must not leak a hole.
    let fields = session.submit();
    assert!(fields.contains_key("companies[0].name"));
    assert!(fields.contains_key("companies[1].name"));
    assert!(!fields.contains_key("companies[2].name"));
}

#[test]
fn append_after_removal_avoids_reusing_a_live_index() {
    let mut session = EditingSession::new(ProfileDocument::new());
    let _a = session.add_company();
    let b = session.add_company();
    let _c = session.add_company();
    session.advance(MUTATION_SETTLE_MS);

    // Stamped prefixes still read [0] and [2]; the scan must append at [3],
    // not collide with the surviving [2].
    assert!(session.remove_node(b, RemovalChoice::Confirm));
    let d = session.add_company();
    let provisional = session
        .document()
        .find_node(d)
        .expect("new company should exist")
        .serial_prefix
        .clone();
    assert_eq!(provisional, "companies[3]");

    session.advance(MUTATION_SETTLE_MS);
    let settled = session
        .document()
        .find_node(d)
        .expect("new company should exist")
        .serial_prefix
        .clone();
    assert_eq!(settled, "companies[2]");
}

#[test]
fn sort_order_always_equals_position_after_mutations() {
    let mut session = EditingSession::new(ProfileDocument::new());
    for _ in 0..4 {
        session.add_education();
    }
    session.advance(MUTATION_SETTLE_MS);
    let second = session.document().educations.nodes[1].node_id;
    assert!(session.remove_node(second, RemovalChoice::Confirm));

    let orders: Vec<i64> = session
        .document()
        .educations
        .nodes
        .iter()
        .map(|node| node.sort_order)
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}
