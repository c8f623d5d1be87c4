use super::*;
use crate::layers::model::{ShapeLayer, TextLayer};

#[test]
fn first_id_is_one_and_ids_grow() {
    let mut stack = LayerStack::<TextLayer>::new();
    assert_eq!(stack.next_id(), Some(1));
    let a = stack.add(TextLayer::default()).unwrap();
    let b = stack.add(TextLayer::default()).unwrap();
    assert_eq!((a.id, b.id), (1, 2));
    assert_eq!(stack.ids(), vec![1, 2]);
}

#[test]
fn removing_highest_id_frees_it() {
    let mut stack = LayerStack::<ShapeLayer>::new();
    for _ in 0..3 {
        stack.add(ShapeLayer::default()).unwrap();
    }
    assert_eq!(stack.remove(3), Mutation::Applied);
    assert_eq!(stack.next_id(), Some(3));

    assert_eq!(stack.remove(1), Mutation::Applied);
    assert_eq!(stack.next_id(), Some(3));
    assert_eq!(stack.add(ShapeLayer::default()).unwrap().id, 3);
}

#[test]
fn emptied_stack_restarts_at_one() {
    let mut stack = LayerStack::<ShapeLayer>::new();
    stack.add(ShapeLayer::default()).unwrap();
    stack.add(ShapeLayer::default()).unwrap();
    stack.remove(1);
    stack.remove(2);
    assert!(stack.is_empty());
    assert_eq!(stack.add(ShapeLayer::default()).unwrap().id, 1);
}

#[test]
fn missing_ids_are_noops() {
    let mut stack = LayerStack::<TextLayer>::new();
    stack.add(TextLayer::default()).unwrap();
    let before = stack.clone();
    assert_eq!(stack.remove(42), Mutation::Noop);
    assert_eq!(stack.update(42, |t| t.text = "x".into()), Mutation::Noop);
    assert_eq!(stack, before);
}

#[test]
fn update_changes_only_target_and_keeps_id() {
    let mut stack = LayerStack::<TextLayer>::new();
    stack.add(TextLayer::default()).unwrap();
    stack.add(TextLayer::default()).unwrap();
    let m = stack.update(2, |t| {
        t.text = "hello".into();
        t.id = 99;
    });
    assert!(m.changed());
    assert_eq!(stack.get(2).unwrap().text, "hello");
    assert_eq!(stack.get(1).unwrap().text, "edit");
    assert!(!stack.contains(99));
}

#[test]
fn duplicate_appends_copy_on_top() {
    let mut stack = LayerStack::<ShapeLayer>::new();
    let mut template = ShapeLayer::default();
    template.color = "red".into();
    let first = stack.add(template).unwrap();
    stack.add(ShapeLayer::default()).unwrap();

    let copy = stack.duplicate(&first).unwrap();
    assert_eq!(copy.id, 3);
    assert_eq!(copy.color, "red");
    assert_eq!(stack.as_slice().last().unwrap().id, 3);
    assert_eq!(stack.len(), 3);
}

#[test]
fn from_vec_rejects_duplicate_ids() {
    let mut a = ShapeLayer::default();
    a.id = 5;
    assert!(LayerStack::from_vec(vec![a.clone(), a.clone()]).is_none());
    let stack = LayerStack::from_vec(vec![a]).unwrap();
    assert_eq!(stack.next_id(), Some(6));
}

#[test]
fn exhausted_ids_are_an_error_not_a_wrap() {
    let mut top = ShapeLayer::default();
    top.id = LayerId::MAX - 1;
    let mut stack = LayerStack::from_vec(vec![top]).unwrap();

    let last = stack.add(ShapeLayer::default()).unwrap();
    assert_eq!(last.id, LayerId::MAX);
    assert_eq!(stack.next_id(), None);

    let err = stack.add(ShapeLayer::default()).unwrap_err();
    assert!(matches!(err, UnderlayError::Validation(_)));
    assert!(stack.duplicate(&last).is_err());
    assert_eq!(stack.len(), 2);
    assert!(!stack.contains(0));
}
