//! End-to-end forward/backward scenarios over small production chains.

use pf_catalog::{Catalog, IngredientDoc, PartDoc, PartsDoc, RecipeDoc, RecipesDoc};
use pf_graph::{Graph, PinRef, Pos};
use pf_solver::{
    Evaluator, balance_node, balanced_value, demand_output, push_balance_node, recipe_report,
};

fn steel_catalog() -> Catalog {
    Catalog::from_docs(
        PartsDoc {
            parts: vec![
                PartDoc {
                    name: "Iron".into(),
                    img_path: String::new(),
                },
                PartDoc {
                    name: "Coal".into(),
                    img_path: String::new(),
                },
                PartDoc {
                    name: "Steel".into(),
                    img_path: String::new(),
                },
            ],
        },
        RecipesDoc {
            recipes: vec![RecipeDoc {
                id: 1,
                inputs: vec![
                    IngredientDoc {
                        part: "Iron".into(),
                        quantity: 2.0,
                    },
                    IngredientDoc {
                        part: "Coal".into(),
                        quantity: 1.0,
                    },
                ],
                outputs: vec![IngredientDoc {
                    part: "Steel".into(),
                    quantity: 1.0,
                }],
            }],
        },
    )
}

#[test]
fn scenario_a_input_part_output_forward() {
    let catalog = steel_catalog();
    let mut graph = Graph::new();
    let input = graph.add_input(Pos::default(), 10.0);
    let part = graph.add_part(Pos::default(), catalog.find_part("Iron").unwrap());
    let sink = graph.add_output(Pos::default());

    graph.set_part_ratio(part, 0, 2.0).unwrap();
    graph
        .connect(PinRef::new(input, "out"), PinRef::new(part, "in1"))
        .unwrap();
    graph
        .connect(PinRef::new(part, "out1"), PinRef::new(sink, "in"))
        .unwrap();

    let mut eval = Evaluator::new(&catalog);
    assert_eq!(eval.sink_value(&graph, sink).unwrap(), 20.0);
}

fn steel_chain(catalog: &Catalog) -> (Graph, SteelChain) {
    let mut graph = Graph::new();
    let iron = graph.add_input(Pos::default(), 10.0);
    let coal = graph.add_input(Pos::default(), 10.0);
    let recipe = graph
        .add_recipe(Pos::default(), catalog.find_recipe(1).unwrap(), catalog)
        .unwrap();
    let sink = graph.add_output(Pos::default());

    graph
        .connect(PinRef::new(iron, "out"), PinRef::new(recipe, "Iron"))
        .unwrap();
    graph
        .connect(PinRef::new(coal, "out"), PinRef::new(recipe, "Coal"))
        .unwrap();
    graph
        .connect(PinRef::new(recipe, "Steel"), PinRef::new(sink, "in"))
        .unwrap();

    (
        graph,
        SteelChain {
            iron,
            coal,
            recipe,
            sink,
        },
    )
}

struct SteelChain {
    iron: pf_core::NodeId,
    coal: pf_core::NodeId,
    recipe: pf_core::NodeId,
    sink: pf_core::NodeId,
}

#[test]
fn scenario_b_recipe_limiting_ratio_and_surplus() {
    let catalog = steel_catalog();
    let (graph, chain) = steel_chain(&catalog);

    let mut eval = Evaluator::new(&catalog);
    // limiting ratio = min(10/2, 10/1) = 5, so Steel output = 5
    assert_eq!(eval.sink_value(&graph, chain.sink).unwrap(), 5.0);

    let report = recipe_report(&graph, &catalog, chain.recipe).unwrap();
    assert_eq!(report.limiting_ratio, 5.0);

    let iron = &report.inputs[0];
    assert_eq!(iron.part, "Iron");
    assert_eq!(iron.ratio, 5.0);
    assert_eq!(iron.surplus, 0.0);

    let coal = &report.inputs[1];
    assert_eq!(coal.part, "Coal");
    assert_eq!(coal.ratio, 10.0);
    // surplus = supplied * (ratio - limiting) = 10 * (10 - 5)
    assert_eq!(coal.surplus, 50.0);
}

#[test]
fn scenario_c_backward_demand_reaches_inputs() {
    let catalog = steel_catalog();
    let (mut graph, chain) = steel_chain(&catalog);

    demand_output(&mut graph, &catalog, chain.sink, 5.0).unwrap();

    assert_eq!(balanced_value(&graph, chain.recipe).unwrap(), 5.0);
    // required Iron = 5 / (1/2) = 10, required Coal = 5 / (1/1) = 5
    assert_eq!(balanced_value(&graph, chain.iron).unwrap(), 10.0);
    assert_eq!(balanced_value(&graph, chain.coal).unwrap(), 5.0);

    // The demands became the Input nodes' displayed values, so a forward
    // pass now reproduces exactly the demanded rate.
    let mut eval = Evaluator::new(&catalog);
    assert_eq!(eval.sink_value(&graph, chain.sink).unwrap(), 5.0);
}

#[test]
fn part_balance_rederives_ratios_and_pools_demand() {
    let catalog = steel_catalog();
    let mut graph = Graph::new();
    let supply = graph.add_input(Pos::default(), 1.0);
    let part = graph.add_part(Pos::default(), catalog.find_part("Iron").unwrap());
    graph.part_add_output(part, 1.0).unwrap();
    let a = graph.add_output(Pos::default());
    let b = graph.add_output(Pos::default());

    graph
        .connect(PinRef::new(supply, "out"), PinRef::new(part, "in1"))
        .unwrap();
    graph
        .connect(PinRef::new(part, "out1"), PinRef::new(a, "in"))
        .unwrap();
    graph
        .connect(PinRef::new(part, "out2"), PinRef::new(b, "in"))
        .unwrap();

    // Two constraints, one per connected output pin: J = 6 + 2 = 8.
    balance_node(&mut graph, &catalog, part, &[6.0, 2.0]).unwrap();

    assert_eq!(balanced_value(&graph, part).unwrap(), 8.0);
    let pf_graph::NodeKind::Part(state) = &graph.node(part).unwrap().kind else {
        panic!("expected part");
    };
    assert_eq!(state.out_ratios, vec![0.75, 0.25]);
    // The pooled total J was demanded from the supplier unchanged.
    assert_eq!(balanced_value(&graph, supply).unwrap(), 8.0);
}

#[test]
fn part_with_zero_output_pins_balances_as_noop() {
    let catalog = steel_catalog();
    let mut graph = Graph::new();
    let supply = graph.add_input(Pos::default(), 3.0);
    let part = graph.add_part(Pos::default(), catalog.find_part("Iron").unwrap());
    graph
        .connect(PinRef::new(supply, "out"), PinRef::new(part, "in1"))
        .unwrap();
    graph.part_remove_output(part).unwrap();

    balance_node(&mut graph, &catalog, part, &[]).unwrap();

    // Nothing propagated, nothing recorded.
    assert!(balanced_value(&graph, part).is_err());
    let pf_graph::NodeKind::Input(input) = &graph.node(supply).unwrap().kind else {
        panic!("expected input");
    };
    assert_eq!(input.value, 3.0);
}

#[test]
fn partial_constraint_set_leaves_node_pending() {
    let catalog = steel_catalog();
    let mut graph = Graph::new();
    let part = graph.add_part(Pos::default(), catalog.find_part("Iron").unwrap());
    graph.part_add_output(part, 1.0).unwrap();
    let a = graph.add_output(Pos::default());
    let b = graph.add_output(Pos::default());
    graph
        .connect(PinRef::new(part, "out1"), PinRef::new(a, "in"))
        .unwrap();
    graph
        .connect(PinRef::new(part, "out2"), PinRef::new(b, "in"))
        .unwrap();

    // Only one of two connected output pins gets a constraint.
    balance_node(&mut graph, &catalog, part, &[4.0]).unwrap();

    let node = graph.node(part).unwrap();
    assert!(node.has_pending());
    assert_eq!(node.pending_received(), 1);
    assert!(balanced_value(&graph, part).is_err());
}

#[test]
fn balance_node_ports_forward_and_push_upstream() {
    let catalog = steel_catalog();
    let mut graph = Graph::new();
    let supply = graph.add_input(Pos::default(), 1.0);
    let junction = graph.add_balance(Pos::default());
    let sink = graph.add_output(Pos::default());

    graph
        .connect(PinRef::new(supply, "out"), PinRef::new(junction, "in1"))
        .unwrap();
    graph
        .connect(PinRef::new(junction, "out1"), PinRef::new(sink, "in"))
        .unwrap();
    graph.set_balance_value(junction, 0, 7.0).unwrap();

    // Forward: the port value is what flows on.
    let mut eval = Evaluator::new(&catalog);
    assert_eq!(eval.sink_value(&graph, sink).unwrap(), 7.0);

    // Backward: the same value is the injected demand.
    push_balance_node(&mut graph, &catalog, junction).unwrap();
    assert_eq!(balanced_value(&graph, supply).unwrap(), 7.0);
}

#[test]
fn later_demand_on_same_sink_wins() {
    let catalog = steel_catalog();
    let mut graph = Graph::new();
    let supply = graph.add_input(Pos::default(), 0.0);
    let sink = graph.add_output(Pos::default());
    graph
        .connect(PinRef::new(supply, "out"), PinRef::new(sink, "in"))
        .unwrap();

    demand_output(&mut graph, &catalog, sink, 5.0).unwrap();
    assert_eq!(balanced_value(&graph, supply).unwrap(), 5.0);

    demand_output(&mut graph, &catalog, sink, 9.0).unwrap();
    assert_eq!(balanced_value(&graph, supply).unwrap(), 9.0);
}

#[test]
fn composite_evaluates_and_balances_through_boundary() {
    let catalog = steel_catalog();

    // Nested sub-factory: Input -> Part(ratio 2) -> Output.
    let mut nested = Graph::new();
    let n_in = nested.add_input(Pos::default(), 0.0);
    let n_part = nested.add_part(Pos::default(), catalog.find_part("Iron").unwrap());
    let n_out = nested.add_output(Pos::default());
    nested.set_part_ratio(n_part, 0, 2.0).unwrap();
    nested
        .connect(PinRef::new(n_in, "out"), PinRef::new(n_part, "in1"))
        .unwrap();
    nested
        .connect(PinRef::new(n_part, "out1"), PinRef::new(n_out, "in"))
        .unwrap();

    // Parent chain: Input(3) -> Composite -> Output.
    let mut graph = Graph::new();
    let supply = graph.add_input(Pos::default(), 3.0);
    let composite = graph.add_composite(Pos::default(), "Doubler", nested);
    let sink = graph.add_output(Pos::default());
    graph
        .connect(PinRef::new(supply, "out"), PinRef::new(composite, "in1"))
        .unwrap();
    graph
        .connect(PinRef::new(composite, "out1"), PinRef::new(sink, "in"))
        .unwrap();

    // Forward: the nested ratio doubles the parent supply.
    let mut eval = Evaluator::new(&catalog);
    assert_eq!(eval.sink_value(&graph, sink).unwrap(), 6.0);

    // Backward: a demand of 8 crosses the boundary, balances the nested
    // chain, and lands on the parent supplier.
    demand_output(&mut graph, &catalog, sink, 8.0).unwrap();
    assert_eq!(balanced_value(&graph, composite).unwrap(), 8.0);
    assert_eq!(balanced_value(&graph, supply).unwrap(), 8.0);

    let pf_graph::NodeKind::Composite(inner) = &graph.node(composite).unwrap().kind else {
        panic!("expected composite");
    };
    assert_eq!(
        balanced_value(inner.graph(), inner.input_bindings()[0]).unwrap(),
        8.0
    );
}
