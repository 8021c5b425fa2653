use super::*;

fn attr(name: &str, value: &str) -> Attribute {
    Attribute {
        name: name.to_string(),
        type_hint: None,
        value: value.to_string(),
    }
}

fn sample() -> (SceneGraph, [NodeId; 4]) {
    let mut g = SceneGraph::new();
    let (grp, _) = g.add_node("grp".into(), "transform".into(), None, false, 1);
    let (a, _) = g.add_node("a".into(), "transform".into(), Some(grp), false, 2);
    let (a_shape, _) = g.add_node("aShape".into(), "mesh".into(), Some(a), false, 3);
    let (b, _) = g.add_node("b".into(), "transform".into(), Some(grp), false, 4);
    (g, [grp, a, a_shape, b])
}

#[test]
fn traverse_is_parent_first_in_creation_order() {
    let (mut g, [grp, a, a_shape, b]) = sample();
    let (other_root, _) = g.add_node("side".into(), "transform".into(), None, false, 5);
    assert_eq!(g.traverse(), vec![grp, a, a_shape, b, other_root]);
    assert_eq!(g.roots(), &[grp, other_root]);
}

#[test]
fn ancestors_walk_to_root() {
    let (g, [grp, a, a_shape, _]) = sample();
    let names: Vec<&str> = g.ancestors(a_shape).map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["a", "grp"]);
    assert_eq!(g.parent_of(a).map(|n| n.id), Some(grp));
    assert!(g.parent_of(grp).is_none());
}

#[test]
fn rename_moves_lookup_but_not_identity() {
    let (mut g, [_, a, _, _]) = sample();
    assert_eq!(g.rename(a, "hero".into()), None);
    assert_eq!(g.lookup("hero"), Some(a));
    assert_eq!(g.lookup("a"), None);
    assert_eq!(g.node(a).unwrap().name, "hero");
}

#[test]
fn duplicate_name_keeps_first_node_and_moves_lookup() {
    let (mut g, [grp, a, _, _]) = sample();
    let (dup, displaced) = g.add_node("a".into(), "joint".into(), Some(grp), false, 9);
    assert_eq!(displaced, Some(a));
    assert_eq!(g.lookup("a"), Some(dup));
    assert_eq!(g.node(a).unwrap().node_type, "transform");
    assert_eq!(g.node(grp).unwrap().children.len(), 3);
}

#[test]
fn set_attribute_overwrites_in_place() {
    let (mut g, [_, a, _, _]) = sample();
    g.set_attribute(a, attr("t", "0 0 0"));
    g.set_attribute(a, attr("v", "no"));
    g.set_attribute(a, attr("t", "1 2 3"));
    let node = g.node(a).unwrap();
    assert_eq!(node.attributes.len(), 2);
    assert_eq!(node.attributes[0].value, "1 2 3");
    assert_eq!(node.attribute(".t").unwrap().value, "1 2 3");
}

#[test]
fn next_free_name_skips_taken() {
    let mut g = SceneGraph::new();
    g.add_node("transform1".into(), "transform".into(), None, false, 1);
    assert_eq!(g.next_free_name("transform"), "transform2");
    assert_eq!(g.next_free_name("camera"), "camera1");
}

#[test]
fn plugs_resolve_to_leaf_node_names() {
    assert_eq!(plug_node("persp.t"), "persp");
    assert_eq!(plug_node("|grp|persp.t"), "persp");
    assert_eq!(plug_node(":time1.o"), ":time1");
    assert_eq!(leaf_name("|a|b"), "b");
}
