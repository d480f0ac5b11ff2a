//! Trait objects that no registered type extends: subtyping comes from the
//! casts each concrete type declares.

use crate::{Error, MemberOptions, ObjectOptions, Reflect, SettingsPatch, TypedJson};

trait Point: Reflect {
    fn position(&self) -> (f64, f64);
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(upcast(dyn Point))]
struct SmallNode {
    x: f64,
    y: f64,
    input_type: String,
    output_type: String,
}

impl Point for SmallNode {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(upcast(dyn Point))]
struct BigNode {
    x: f64,
    y: f64,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl Point for BigNode {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

#[derive(Reflect, Default)]
struct Label {
    text: String,
}

#[derive(Reflect, Default)]
struct GraphGrid {
    points: Vec<Box<dyn Point>>,
    root: Option<Box<dyn Point>>,
}

fn typed_json() -> TypedJson {
    let json = TypedJson::new();
    {
        let mut registry = json.registry().write();
        registry.register_abstract::<dyn Point>(ObjectOptions::new());
        registry
            .register::<SmallNode>(ObjectOptions::new())
            .member("x", MemberOptions::new())
            .unwrap()
            .member("y", MemberOptions::new())
            .unwrap()
            .member("input_type", MemberOptions::new().name("inputType"))
            .unwrap()
            .member("output_type", MemberOptions::new().name("outputType"))
            .unwrap();
        registry
            .register::<BigNode>(ObjectOptions::new())
            .member("x", MemberOptions::new())
            .unwrap()
            .member("y", MemberOptions::new())
            .unwrap()
            .member("inputs", MemberOptions::new())
            .unwrap()
            .member("outputs", MemberOptions::new())
            .unwrap();
        registry
            .register::<Label>(ObjectOptions::new())
            .member("text", MemberOptions::new())
            .unwrap();
        registry
            .register::<GraphGrid>(
                ObjectOptions::new()
                    .known_type::<BigNode>()
                    .known_type::<SmallNode>()
                    .known_type::<Label>(),
            )
            .member("points", MemberOptions::new().refers_abstract(true))
            .unwrap()
            .member("root", MemberOptions::new().refers_abstract(true))
            .unwrap();
    }
    json
}

fn sample_grid() -> GraphGrid {
    let mut grid = GraphGrid::default();
    for i in 0..20_u32 {
        let (x, y) = (f64::from(i) * 0.5, f64::from(i) * -1.25);
        let point: Box<dyn Point> = if i % 4 == 3 {
            Box::new(BigNode {
                x,
                y,
                inputs: vec![String::from("string"), String::from("void")],
                outputs: vec![String::from("float")],
            })
        } else {
            Box::new(SmallNode {
                x,
                y,
                input_type: String::from("integer"),
                output_type: String::from("boolean"),
            })
        };
        if i == 0 {
            grid.root = Some(point);
        } else {
            grid.points.push(point);
        }
    }
    grid
}

#[test]
fn round_trip() {
    let json = typed_json();
    let grid = sample_grid();

    let text = json.serialize(&grid, None).unwrap();
    let reparsed: GraphGrid = json.deserialize(&text, None).unwrap();

    assert_eq!(reparsed.points.len(), grid.points.len());
    for (before, after) in grid.points.iter().zip(&reparsed.points) {
        assert_eq!(before.position(), after.position());
        assert_eq!((**before).ty_id(), (**after).ty_id());
    }
    assert_eq!(
        reparsed.root.as_deref().map(|point| point.position()),
        Some((0.0, 0.0))
    );
}

#[test]
fn unrelated_hint_fails_strict_check() {
    let json = typed_json();
    let text = r#"{"points":[{"__type":"Label","text":"hello"}]}"#;

    let Err(err) = json.deserialize::<GraphGrid>(text, None) else {
        panic!("a label is not a point");
    };
    assert!(matches!(
        err,
        Error::InvalidSubtype { ref hint, ref expected, .. } if hint == "Label" && expected == "Point"
    ));

    // Without the check the label is read, but cannot be stored as a point.
    let lenient = SettingsPatch::new().strict(false);
    let Err(err) = json.deserialize::<GraphGrid>(text, Some(lenient)) else {
        panic!("a label cannot be stored as a point");
    };
    assert!(matches!(
        err,
        Error::Assign { ref path, .. } if path == "GraphGrid.points"
    ));
}
