use std::pin::Pin;

use art_gallery::flow::{Mutation, Out};
use futures::executor::block_on;

#[derive(Default)]
struct Shelf {
    items: Vec<&'static str>,
}

fn apply(out: Out<Shelf>, shelf: &mut Shelf) -> usize {
    match out {
        Out::FutFn(futures) => {
            let count = futures.len();
            for fut in futures.into_iter().map(Pin::from) {
                let mutation = block_on(fut);
                mutation(shelf);
            }
            count
        }
        Out::Empty => 0,
    }
}

#[test]
fn should_default_to_empty_output() {
    let mut shelf = Shelf::default();
    assert_eq!(apply(Out::default(), &mut shelf), 0);
    assert!(shelf.items.is_empty());
}

#[test]
fn should_apply_resolved_mutations_in_order() {
    let canvas: Mutation<Shelf> = Box::new(|shelf: &mut Shelf| shelf.items.push("canvas"));
    let bust: Mutation<Shelf> = Box::new(|shelf: &mut Shelf| shelf.items.push("bust"));
    let out = Out::FutFn(vec![
        Box::new(async move { canvas }),
        Box::new(async move { bust }),
    ]);

    let mut shelf = Shelf::default();
    assert_eq!(apply(out, &mut shelf), 2);
    assert_eq!(shelf.items, vec!["canvas", "bust"]);
}
