use vitae_core::{
    ContainerAddr, ContainerKind, DragItem, DropEvent, EditingSession, NodeId, ProfileDocument,
    ReorderError, SessionError, TextField, MUTATION_SETTLE_MS, TEXT_DEBOUNCE_MS,
};

/// Session holding two categories and one pooled chip named "Rust".
fn transfer_fixture() -> (EditingSession, NodeId, NodeId) {
    let mut session = EditingSession::new(ProfileDocument::new());
    let company = session.add_company();
    let project = session
        .add_project(company)
        .expect("company should accept a project");
    let tech = session
        .document()
        .find_node(project)
        .expect("project should exist")
        .container(ContainerKind::MetaItems)
        .expect("project should own meta items")
        .nodes[2]
        .container(ContainerKind::TechStacks)
        .expect("tech group should own stacks")
        .nodes[0]
        .node_id;
    session
        .set_text(tech, TextField::TechName, "Rust")
        .expect("tech name slot should exist");
    let backend = session.add_skill_category();
    let frontend = session.add_skill_category();
    session.advance(TEXT_DEBOUNCE_MS);
    (session, backend, frontend)
}

fn skills_addr(category: NodeId) -> ContainerAddr {
    ContainerAddr::Child {
        parent: category,
        kind: ContainerKind::Skills,
    }
}

fn skills_of(session: &EditingSession, category: NodeId) -> Vec<vitae_core::Node> {
    session
        .document()
        .find_node(category)
        .expect("category should exist")
        .container(ContainerKind::Skills)
        .expect("category should own skills")
        .nodes
        .clone()
}

#[test]
fn pool_to_category_materializes_a_new_entry() {
    let (mut session, backend, _) = transfer_fixture();

    let outcome = session
        .complete_drop(&DropEvent {
            source: ContainerAddr::SkillPool,
            destination: skills_addr(backend),
            item: DragItem::Chip("Rust".to_string()),
            to_index: 0,
        })
        .expect("pool to category drop should apply");
    assert!(outcome.moved);
    assert!(outcome.skill_relevant);

    let skills = skills_of(&session, backend);
    assert_eq!(skills.len(), 1);
    let entry = &skills[0];
    assert!(entry.id.is_empty());
    assert!(entry.version.is_empty());
    assert!(entry.visible);
    assert_eq!(entry.sort_order, 0);
    assert!(!session.pool().contains(&"Rust".to_string()));
}

#[test]
fn category_to_pool_dissolves_the_entry() {
    let (mut session, backend, _) = transfer_fixture();
    session
        .complete_drop(&DropEvent {
            source: ContainerAddr::SkillPool,
            destination: skills_addr(backend),
            item: DragItem::Chip("Rust".to_string()),
            to_index: 0,
        })
        .expect("pool to category drop should apply");
    session.advance(MUTATION_SETTLE_MS);
    let entry = skills_of(&session, backend)[0].node_id;

    session
        .complete_drop(&DropEvent {
            source: skills_addr(backend),
            destination: ContainerAddr::SkillPool,
            item: DragItem::Node(entry),
            to_index: 0,
        })
        .expect("category to pool drop should apply");

    assert!(skills_of(&session, backend).is_empty());
    assert_eq!(session.pool(), ["Rust".to_string()]);
}

#[test]
fn category_to_category_resets_persisted_identity() {
    // Load a document whose assignment already carries server identity.
    let mut doc = ProfileDocument::new();
    let mut backend_node = vitae_core::Node::with_identity(
        "5",
        "1",
        vitae_core::NodePayload::SkillCategory {
            name: "Backend".to_string(),
        },
    );
    backend_node
        .container_mut(ContainerKind::Skills)
        .expect("category should own skills")
        .push(vitae_core::Node::with_identity(
            "42",
            "7",
            vitae_core::NodePayload::Skill {
                name: "Rust".to_string(),
            },
        ));
    doc.skill_categories.push(backend_node);
    let backend = doc.skill_categories.nodes[0].node_id;

    let mut session = EditingSession::new(doc);
    let frontend = session.add_skill_category();
    session.advance(MUTATION_SETTLE_MS);

    let entry = skills_of(&session, backend)[0].node_id;
    assert_eq!(skills_of(&session, backend)[0].id, "42");

    session
        .complete_drop(&DropEvent {
            source: skills_addr(backend),
            destination: skills_addr(frontend),
            item: DragItem::Node(entry),
            to_index: 0,
        })
        .expect("category to category drop should apply");

    assert!(skills_of(&session, backend).is_empty());
    let moved = skills_of(&session, frontend);
    assert_eq!(moved.len(), 1);
    assert!(moved[0].id.is_empty());
    assert!(moved[0].version.is_empty());
}

#[test]
fn cross_container_drop_outside_the_group_is_rejected() {
    let (mut session, backend, _) = transfer_fixture();
    let company = session.document().companies.nodes[0].node_id;

    let err = session
        .complete_drop(&DropEvent {
            source: ContainerAddr::Root(ContainerKind::Companies),
            destination: skills_addr(backend),
            item: DragItem::Node(company),
            to_index: 0,
        })
        .expect_err("company list does not share the skill group");
    assert!(matches!(
        err,
        SessionError::Reorder(ReorderError::InterchangeViolation { .. })
    ));
    assert_eq!(session.document().companies.nodes.len(), 1);
}

#[test]
fn pool_chips_do_not_sort_in_place() {
    let (mut session, _, _) = transfer_fixture();
    session.add_manual_skill("Go");
    assert_eq!(
        session.pool(),
        ["Rust".to_string(), "Go".to_string()]
    );

    let outcome = session
        .complete_drop(&DropEvent {
            source: ContainerAddr::SkillPool,
            destination: ContainerAddr::SkillPool,
            item: DragItem::Chip("Go".to_string()),
            to_index: 0,
        })
        .expect("same-container drop on the pool should be accepted");
    assert!(!outcome.moved);
    assert_eq!(
        session.pool(),
        ["Rust".to_string(), "Go".to_string()]
    );
}

#[test]
fn drop_on_an_unattached_container_is_an_error() {
    let (mut session, _, _) = transfer_fixture();
    let ghost = ContainerAddr::Child {
        parent: uuid::Uuid::new_v4(),
        kind: ContainerKind::Skills,
    };
    let err = session
        .complete_drop(&DropEvent {
            source: ContainerAddr::SkillPool,
            destination: ghost,
            item: DragItem::Chip("Rust".to_string()),
            to_index: 0,
        })
        .expect_err("unattached destination must be rejected");
    assert!(matches!(
        err,
        SessionError::Reorder(ReorderError::ContainerNotAttached(_))
    ));
}
