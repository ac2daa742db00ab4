use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::rc::Rc;
use std::str::FromStr;

use serde_json::{Value, json};
use vc_reflect::Reflect;
use vc_reflect::hash::{HashMap, SeededHashState};
use vc_reflect::info::{TypePath, Typed};
use vc_reflect::ops::{NdArray, Shared};
use vc_reflect::registry::TypeRegistry;

use super::JsonFormatter;
use crate::{AssemblyStyle, ContextStates, ConvertError, DeserializationCallback, DeserializeBag};
use crate::{FormatError, FormatterConfig, ObjectReference, ProtocolError, SerializationBag};
use crate::{SerializeBag, StreamingContext, StringConverter, Surrogate, SurrogateTable};
use crate::{TypeTraitDeserializationCallback, TypeTraitDeserializeBag, TypeTraitObjectReference};
use crate::{TypeTraitSerializeBag, TypeTraitStringConvert};

// -----------------------------------------------------------------------------
// Fixtures

vc_reflect::reflect_struct! {
    #[derive(Default, Debug, Clone, PartialEq)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }
}

vc_reflect::reflect_struct! {
    #[derive(Default, Debug, PartialEq)]
    pub struct Line {
        pub start: Point,
        pub end: Point,
    }
}

vc_reflect::reflect_struct! {
    #[derive(Default)]
    pub struct Node {
        pub name: String,
        pub next: Option<Shared<Node>>,
    }
}

vc_reflect::reflect_struct! {
    #[derive(Default)]
    pub struct Pair {
        pub left: Option<Shared<Point>>,
        pub right: Option<Shared<Point>>,
    }
}

vc_reflect::reflect_struct! {
    #[derive(Default)]
    pub struct Tracked {
        pub name: String,
        pub child: Option<Shared<Tracked>>,
    }
}

impl DeserializationCallback for Tracked {
    fn on_deserialization(&mut self, ctx: &StreamingContext) -> Result<(), ProtocolError> {
        let log = ctx
            .additional::<RefCell<Vec<String>>>()
            .ok_or_else(|| ProtocolError::custom("no log"))?;
        let child = match &self.child {
            Some(child) => child.borrow().name.clone(),
            None => String::from("-"),
        };
        log.borrow_mut().push(format!("{}>{child}", self.name));
        Ok(())
    }
}

vc_reflect::reflect_struct! {
    #[derive(Default)]
    pub struct SharedProxy {
        pub x: i32,
    }
}

impl ObjectReference for SharedProxy {
    fn resolve_real_object(&self, _: &StreamingContext) -> Result<Box<dyn Reflect>, ProtocolError> {
        Ok(Box::new(Shared::new(Point {
            x: self.x,
            y: self.x,
        })))
    }
}

vc_reflect::reflect_struct! {
    #[derive(Default)]
    pub struct ValueProxy {
        pub x: i32,
    }
}

impl ObjectReference for ValueProxy {
    fn resolve_real_object(&self, _: &StreamingContext) -> Result<Box<dyn Reflect>, ProtocolError> {
        Ok(Box::new(Point { x: self.x, y: -self.x }))
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Celsius(f64);
vc_reflect::reflect_opaque!(Celsius, default);

impl SerializeBag for Celsius {
    fn produce_bag(&self, bag: &mut SerializationBag, _: &StreamingContext) -> Result<(), ProtocolError> {
        bag.add("degrees", self.0);
        Ok(())
    }
}

impl DeserializeBag for Celsius {
    fn absorb_bag(&mut self, bag: &mut SerializationBag, _: &StreamingContext) -> Result<(), ProtocolError> {
        self.0 = bag.take::<f64>("degrees")?;
        Ok(())
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Kelvin(f64);
vc_reflect::reflect_opaque!(Kelvin, default);

impl SerializeBag for Kelvin {
    fn produce_bag(&self, bag: &mut SerializationBag, _: &StreamingContext) -> Result<(), ProtocolError> {
        bag.set_type_of::<KelvinProxy>();
        bag.add("celsius", self.0 - 273.15);
        Ok(())
    }
}

/// Stands in for a [`Kelvin`] in documents.
#[derive(Default)]
pub struct KelvinProxy(f64);
vc_reflect::reflect_opaque!(KelvinProxy, default);

impl DeserializeBag for KelvinProxy {
    fn absorb_bag(&mut self, bag: &mut SerializationBag, _: &StreamingContext) -> Result<(), ProtocolError> {
        self.0 = bag.take::<f64>("celsius")?;
        Ok(())
    }
}

impl ObjectReference for KelvinProxy {
    fn resolve_real_object(&self, _: &StreamingContext) -> Result<Box<dyn Reflect>, ProtocolError> {
        Ok(Box::new(Kelvin(self.0 + 273.15)))
    }
}

#[derive(Default)]
pub struct Faulty(u8);
vc_reflect::reflect_opaque!(Faulty, default);

impl SerializeBag for Faulty {
    fn produce_bag(&self, bag: &mut SerializationBag, _: &StreamingContext) -> Result<(), ProtocolError> {
        match self.0 {
            0 => bag.add("@@type@@", 0_u8),
            _ => {
                bag.add("twice", 1_u8);
                bag.add("twice", 2_u8);
            }
        }
        Ok(())
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Tag(String);
vc_reflect::reflect_opaque!(Tag, default);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Tag {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Err("empty tag");
        }
        Ok(Self(text.to_owned()))
    }
}

vc_reflect::reflect_struct! {
    #[derive(Default)]
    pub struct Labeled {
        pub tag: Tag,
        pub weight: u32,
    }
}

#[derive(Default)]
pub struct Secret(u8);
vc_reflect::reflect_opaque!(Secret, default, non_serializable);

/// Writes a point as `"x;y"`.
struct PointText;

impl StringConverter for PointText {
    fn convert_to_string(&self, value: &dyn Reflect) -> Result<String, ConvertError> {
        let point = value.downcast_ref::<Point>().ok_or(ConvertError::Mismatched {
            expected: Point::type_path(),
            found: value.reflect_type_path(),
        })?;
        Ok(format!("{};{}", point.x, point.y))
    }

    fn convert_from_string(&self, text: &str) -> Result<Box<dyn Reflect>, ConvertError> {
        let parse_error = |message: &str| ConvertError::Parse {
            type_path: Point::type_path(),
            text: text.to_owned(),
            message: message.to_owned(),
        };
        let (x, y) = text.split_once(';').ok_or_else(|| parse_error("missing `;`"))?;
        let x = x.parse().map_err(|_| parse_error("bad x"))?;
        let y = y.parse().map_err(|_| parse_error("bad y"))?;
        Ok(Box::new(Point { x, y }))
    }
}

/// Writes a point as a single `"x,y"` bag entry.
struct PointSurrogate;

impl Surrogate for PointSurrogate {
    fn produce_bag(
        &self,
        value: &dyn Reflect,
        bag: &mut SerializationBag,
        _: &StreamingContext,
    ) -> Result<(), ProtocolError> {
        let point = value
            .downcast_ref::<Point>()
            .ok_or_else(|| ProtocolError::custom("not a point"))?;
        bag.add("xy", format!("{},{}", point.x, point.y));
        Ok(())
    }

    fn absorb_bag(
        &self,
        value: &mut dyn Reflect,
        bag: &mut SerializationBag,
        _: &StreamingContext,
    ) -> Result<(), ProtocolError> {
        let text = bag.take::<String>("xy")?;
        let point = value
            .downcast_mut::<Point>()
            .ok_or_else(|| ProtocolError::custom("not a point"))?;
        let (x, y) = text
            .split_once(',')
            .ok_or_else(|| ProtocolError::custom("missing `,`"))?;
        point.x = x.parse().map_err(ProtocolError::custom)?;
        point.y = y.parse().map_err(ProtocolError::custom)?;
        Ok(())
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Vec<i32>>();
    registry.register::<Vec<f64>>();
    registry.register::<Line>();
    registry.register::<Shared<Node>>();
    registry.register::<Pair>();
    registry.register::<NdArray<i32, 2>>();
    registry.register::<NdArray<u8, 1>>();
    registry.register::<NdArray<i32, 4>>();
    registry.register::<Vec<Shared<i32>>>();
    registry.register::<BTreeMap<String, i32>>();
    registry.register::<HashMap<String, i32, SeededHashState>>();
    registry.register::<Labeled>();
    registry.register::<Celsius>();
    registry.register::<Faulty>();
    registry.register::<Kelvin>();
    registry.register::<KelvinProxy>();
    registry.register::<Secret>();
    registry.register::<Shared<Tracked>>();
    registry.register::<SharedProxy>();
    registry.register::<ValueProxy>();

    registry.register_type_trait::<Celsius, TypeTraitSerializeBag>();
    registry.register_type_trait::<Celsius, TypeTraitDeserializeBag>();
    registry.register_type_trait::<Faulty, TypeTraitSerializeBag>();
    registry.register_type_trait::<Kelvin, TypeTraitSerializeBag>();
    registry.register_type_trait::<KelvinProxy, TypeTraitDeserializeBag>();
    registry.register_type_trait::<KelvinProxy, TypeTraitObjectReference>();
    registry.register_type_trait::<Tag, TypeTraitStringConvert>();
    registry.register_type_trait::<Tracked, TypeTraitDeserializationCallback>();
    registry.register_type_trait::<SharedProxy, TypeTraitObjectReference>();
    registry.register_type_trait::<ValueProxy, TypeTraitObjectReference>();
    registry
}

fn compact(registry: &TypeRegistry) -> JsonFormatter<'_> {
    JsonFormatter::new(registry).with_pretty(false)
}

fn point_id() -> &'static str {
    "vc_json::formatter::tests::Point, vc_json"
}

// -----------------------------------------------------------------------------
// Compactness and classification

#[test]
fn known_types_are_written_bare() {
    let registry = registry();
    let formatter = compact(&registry);

    let text = formatter.serialize(&vec![1, 2, 3]).unwrap();
    assert_eq!(text, "[1,2,3]");
    let back: Vec<i32> = formatter.deserialize(&text).unwrap();
    assert_eq!(back, [1, 2, 3]);

    let point = Point { x: 1, y: 2 };
    let json = formatter.to_value(&point, Some(Point::type_info())).unwrap();
    assert_eq!(json, json!({ "@@info@@": "root", "x": 1, "y": 2 }));
}

#[test]
fn unknown_root_is_tagged() {
    let registry = registry();
    let formatter = compact(&registry);

    let point = Point { x: 1, y: 2 };
    let json = formatter.to_value(&point, None).unwrap();
    assert_eq!(
        json,
        json!({ "@@info@@": "root", "@@type@@": point_id(), "x": 1, "y": 2 })
    );

    let back = formatter.from_value(&json, None).unwrap().unwrap();
    assert_eq!(back.take::<Point>().ok(), Some(point));

    let json = formatter.to_value(&vec![1, 2], None).unwrap();
    assert_eq!(
        json,
        json!({
            "@@info@@": "root",
            "@@type@@": "alloc::vec::Vec[[i32, core]], alloc",
            "@@value@@": [1, 2],
        })
    );
}

#[test]
fn untagged_envelopes() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = json!({ "@@value@@": [1, 2] });
    let list = formatter
        .from_value(&json, Some(<Vec<i32>>::type_info()))
        .unwrap()
        .unwrap()
        .take::<Vec<i32>>()
        .unwrap();
    assert_eq!(list, vec![1, 2]);

    let json = json!({
        "@@lower_bounds@@": [1, 0],
        "@@value@@": [[1, 2]],
    });
    let array = formatter
        .from_value(&json, Some(<NdArray<i32, 2>>::type_info()))
        .unwrap()
        .unwrap()
        .take::<NdArray<i32, 2>>()
        .unwrap();
    assert_eq!(array.cell([1, 1]), Some(&2));
}

#[test]
fn null_roots() {
    let registry = registry();
    let formatter = compact(&registry);

    assert_eq!(formatter.serialize(&None::<i32>).unwrap(), "null");

    let json = formatter.to_value(&None::<i32>, None).unwrap();
    assert_eq!(json[crate::value::VALUE_KEY], Value::Null);
    assert!(json[crate::value::TYPE_KEY].is_string());
    assert!(formatter.from_value(&json, None).unwrap().is_none());
    assert!(formatter.from_value(&Value::Null, None).unwrap().is_none());
}

#[test]
fn nested_values_round_trip() {
    let registry = registry();
    let formatter = JsonFormatter::new(&registry);

    let line = Line {
        start: Point { x: 1, y: 2 },
        end: Point { x: 1, y: 2 },
    };
    let json = formatter.to_value(&line, Some(Line::type_info())).unwrap();
    // Equal value types are written twice, never as references.
    assert_eq!(json["end"], json!({ "@@info@@": "root.end", "x": 1, "y": 2 }));

    let text = formatter.serialize(&line).unwrap();
    assert!(text.contains('\n'));
    let back: Line = formatter.deserialize(&text).unwrap();
    assert_eq!(back, line);
}

#[test]
fn members_are_lenient() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = json!({ "x": 5, "unknown": [1, 2] });
    let back = formatter.from_value(&json, Some(Point::type_info())).unwrap().unwrap();
    assert_eq!(back.take::<Point>().ok(), Some(Point { x: 5, y: 0 }));
}

#[test]
fn non_finite_floats() {
    let registry = registry();
    let formatter = compact(&registry);

    let values = vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1.5];
    let json = formatter.to_value(&values, Some(<Vec<f64>>::type_info())).unwrap();
    assert_eq!(json, json!(["NaN", "Infinity", "-Infinity", 1.5]));

    let back = formatter
        .from_value(&json, Some(<Vec<f64>>::type_info()))
        .unwrap()
        .unwrap()
        .take::<Vec<f64>>()
        .unwrap();
    assert!(back[0].is_nan());
    assert_eq!(back[1..], [f64::INFINITY, f64::NEG_INFINITY, 1.5]);
}

#[test]
fn text_and_io_entry_points() {
    let registry = registry();
    let formatter = compact(&registry);

    let mut buffer = Vec::new();
    formatter
        .to_writer(&mut buffer, &vec![4, 5], Some(<Vec<i32>>::type_info()))
        .unwrap();
    assert_eq!(buffer, b"[4,5]");

    let back = formatter
        .from_reader(&buffer[..], Some(<Vec<i32>>::type_info()))
        .unwrap()
        .unwrap();
    assert_eq!(back.take::<Vec<i32>>().ok(), Some(vec![4, 5]));

    assert!(matches!(
        formatter.from_str("[4,", None),
        Err(FormatError::Json(_))
    ));
}

// -----------------------------------------------------------------------------
// Shared objects

#[test]
fn cycles_are_written_once() {
    let registry = registry();
    let formatter = compact(&registry);

    let node = Shared::new(Node {
        name: "a".into(),
        next: None,
    });
    node.borrow_mut().next = Some(node.clone());

    let json = formatter
        .to_value(&node, Some(<Shared<Node>>::type_info()))
        .unwrap();
    assert_eq!(
        json,
        json!({
            "@@info@@": "root",
            "name": "a",
            "next": { "@@info@@": "root.next", "@@reference@@": "root" },
        })
    );

    let back: Shared<Node> = formatter.deserialize(&json.to_string()).unwrap();
    let next = back.borrow().next.clone().unwrap();
    assert!(Shared::ptr_eq(&next, &back));
    assert_eq!(back.borrow().name, "a");

    // Break the cycles so the nodes are freed.
    node.borrow_mut().next = None;
    back.borrow_mut().next = None;
}

#[test]
fn shared_references_stay_shared() {
    let registry = registry();
    let formatter = compact(&registry);

    let point = Shared::new(Point { x: 3, y: 4 });
    let pair = Pair {
        left: Some(point.clone()),
        right: Some(point),
    };
    let json = formatter.to_value(&pair, Some(Pair::type_info())).unwrap();
    assert_eq!(
        json["right"],
        json!({ "@@info@@": "root.right", "@@reference@@": "root.left" })
    );

    let back: Pair = formatter.deserialize(&json.to_string()).unwrap();
    let (left, right) = (back.left.unwrap(), back.right.unwrap());
    assert!(Shared::ptr_eq(&left, &right));
    assert_eq!(*left.borrow(), Point { x: 3, y: 4 });

    let distinct = Pair {
        left: Some(Shared::new(Point::default())),
        right: Some(Shared::new(Point::default())),
    };
    let back: Pair = formatter.deserialize(&formatter.serialize(&distinct).unwrap()).unwrap();
    assert!(!Shared::ptr_eq(&back.left.unwrap(), &back.right.unwrap()));
}

#[test]
fn shared_elementary_items() {
    let registry = registry();
    let formatter = compact(&registry);

    let five = Shared::new(5);
    let items = vec![five.clone(), five, Shared::new(6)];
    let json = formatter
        .to_value(&items, Some(<Vec<Shared<i32>>>::type_info()))
        .unwrap();
    assert_eq!(
        json,
        json!([5, { "@@info@@": "root[1]", "@@reference@@": "root[0]" }, 6])
    );

    let back: Vec<Shared<i32>> = formatter.deserialize(&json.to_string()).unwrap();
    assert!(Shared::ptr_eq(&back[0], &back[1]));
    assert_eq!(*back[1].borrow(), 5);
    assert_eq!(*back[2].borrow(), 6);
}

#[test]
fn nested_shared_is_rejected() {
    let registry = registry();
    let formatter = compact(&registry);

    let nested = Shared::new(Shared::new(1_u8));
    let result = formatter.to_value(&nested, None);
    assert!(matches!(result, Err(FormatError::NotSerializable { .. })));
}

#[test]
fn reference_errors() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = json!({
        "start": { "x": 1, "y": 2 },
        "end": { "@@info@@": "root.end", "@@reference@@": "root.start" },
    });
    let result = formatter.from_value(&json, Some(Line::type_info()));
    assert!(matches!(
        result,
        Err(FormatError::ValueTypeReference { ref path, ref reference, .. })
            if path == "root.end" && reference == "root.start"
    ));

    let json = json!({ "left": { "@@reference@@": "root.nowhere" } });
    let result = formatter.from_value(&json, Some(Pair::type_info()));
    assert!(matches!(
        result,
        Err(FormatError::UnknownReference { ref path, .. }) if path == "root.left"
    ));
}

// -----------------------------------------------------------------------------
// Arrays

#[test]
fn arrays_keep_lower_bounds() {
    let registry = registry();
    let formatter = compact(&registry);

    let array = NdArray::<i32, 2>::from_vec([2, 3], [1, 0], vec![1, 2, 3, 4, 5, 6]).unwrap();
    let json = formatter.to_value(&array, None).unwrap();
    assert_eq!(
        json,
        json!({
            "@@info@@": "root",
            "@@type@@": "i32[,], core",
            "@@lower_bounds@@": [1, 0],
            "@@value@@": [[1, 2, 3], [4, 5, 6]],
        })
    );

    let back = formatter
        .from_value(&json, None)
        .unwrap()
        .unwrap()
        .take::<NdArray<i32, 2>>()
        .unwrap();
    assert_eq!(back, array);
    assert_eq!(back.lower_bounds(), &[1, 0]);
    assert_eq!(back.cell([1, 0]), Some(&1));
    assert_eq!(back.cell([2, 2]), Some(&6));
}

#[test]
fn zero_based_arrays_are_bare() {
    let registry = registry();
    let formatter = compact(&registry);

    let array = NdArray::<u8, 1>::from_vec([3], [0], vec![7, 8, 9]).unwrap();
    let text = formatter.serialize(&array).unwrap();
    assert_eq!(text, "[7,8,9]");
    let back: NdArray<u8, 1> = formatter.deserialize(&text).unwrap();
    assert_eq!(back, array);

    let empty: NdArray<i32, 2> = formatter.deserialize("[]").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn malformed_arrays() {
    let registry = registry();
    let formatter = compact(&registry);
    let info = Some(<NdArray<i32, 2>>::type_info());

    let result = formatter.from_value(&json!([[1, 2], [3]]), info);
    assert!(matches!(
        result,
        Err(FormatError::RaggedArray { ref path }) if path == "root[1]"
    ));

    let result = formatter.from_value(&json!([1, 2]), info);
    assert!(matches!(
        result,
        Err(FormatError::RankMismatch { expected: 2, found: 1, .. })
    ));

    let json = json!({
        "@@type@@": "i32[,], core",
        "@@lower_bounds@@": [1],
        "@@value@@": [[1]],
    });
    let result = formatter.from_value(&json, info);
    assert!(matches!(result, Err(FormatError::RankMismatch { .. })));
}

#[test]
fn overflowing_lower_bounds() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = json!({
        "@@type@@": "i32[,], core",
        "@@lower_bounds@@": [i64::MAX, 0],
        "@@value@@": [[1], [2]],
    });
    let result = formatter.from_value(&json, None);
    assert!(matches!(
        result,
        Err(FormatError::UnexpectedShape { ref path, .. }) if path == "root"
    ));

    let json = json!({
        "@@type@@": "i32[,], core",
        "@@lower_bounds@@": [i64::MAX - 1, 0],
        "@@value@@": [[1]],
    });
    let array = formatter
        .from_value(&json, None)
        .unwrap()
        .unwrap()
        .take::<NdArray<i32, 2>>()
        .unwrap();
    assert_eq!(array.cell([isize::MAX - 1, 0]), Some(&1));
}

#[test]
fn ragged_arrays_with_huge_first_rows() {
    let registry = registry();
    let formatter = compact(&registry);
    let info = Some(<NdArray<i32, 4>>::type_info());

    // Only the first branch of each level is full; the shape it implies
    // holds more cells than a `usize` can count.
    const WIDTH: usize = 70_000;
    let mut level = Value::Array(vec![json!(0); WIDTH]);
    for _ in 1..4 {
        let mut items = vec![json!([]); WIDTH];
        items[0] = level;
        level = Value::Array(items);
    }

    let result = formatter.from_value(&level, info);
    assert!(matches!(
        result,
        Err(FormatError::RaggedArray { ref path }) if path == "root[0][0][1]"
    ));
}

// -----------------------------------------------------------------------------
// Maps

#[test]
fn default_maps_are_pair_lists() {
    let registry = registry();
    let formatter = compact(&registry);

    let map = BTreeMap::from([("a".to_owned(), 1), ("b".to_owned(), 2)]);
    let json = formatter
        .to_value(&map, Some(<BTreeMap<String, i32>>::type_info()))
        .unwrap();
    assert_eq!(
        json,
        json!([
            { "@@info@@": "root[0]", "Key": "a", "Value": 1 },
            { "@@info@@": "root[1]", "Key": "b", "Value": 2 },
        ])
    );

    let back: BTreeMap<String, i32> = formatter.deserialize(&json.to_string()).unwrap();
    assert_eq!(back, map);

    let result = formatter.from_value(&json!([1]), Some(<BTreeMap<String, i32>>::type_info()));
    assert!(matches!(
        result,
        Err(FormatError::UnexpectedShape { ref path, .. }) if path == "root[0]"
    ));
}

#[test]
fn seeded_maps_keep_their_comparer() {
    let registry = registry();
    let formatter = compact(&registry);

    let mut map = HashMap::<String, i32, SeededHashState>::with_hasher(SeededHashState::new(7));
    map.insert("a".to_owned(), 1);

    let info = <HashMap<String, i32, SeededHashState>>::type_info();
    let json = formatter.to_value(&map, Some(info)).unwrap();
    assert_eq!(
        json["comparer"],
        json!({
            "@@info@@": "root.comparer",
            "@@type@@": "vc_reflect::hash::SeededHashState, vc_reflect",
            "seed": 7,
        })
    );
    assert_eq!(
        json["@@value@@"],
        json!([{ "@@info@@": "root[0]", "Key": "a", "Value": 1 }])
    );

    let back: HashMap<String, i32, SeededHashState> =
        formatter.deserialize(&json.to_string()).unwrap();
    assert_eq!(back.hasher(), &SeededHashState::new(7));
    assert_eq!(back.get("a"), Some(&1));
}

// -----------------------------------------------------------------------------
// Custom protocols

#[test]
fn bags_round_trip() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = formatter.to_value(&Celsius(21.5), Some(Celsius::type_info())).unwrap();
    assert_eq!(
        json,
        json!({
            "@@info@@": "root",
            "@@type@@": "vc_json::formatter::tests::Celsius, vc_json",
            "degrees": {
                "@@info@@": "root.degrees",
                "@@type@@": "f64, core",
                "@@value@@": 21.5,
            },
        })
    );

    let back: Celsius = formatter.deserialize(&json.to_string()).unwrap();
    assert_eq!(back, Celsius(21.5));
}

#[test]
fn bag_errors() {
    let registry = registry();
    let formatter = compact(&registry);

    let result = formatter.to_value(&Faulty(0), None);
    assert!(matches!(
        result,
        Err(FormatError::ReservedKey { ref key, .. }) if key == "@@type@@"
    ));

    let result = formatter.to_value(&Faulty(1), None);
    assert!(matches!(
        result,
        Err(FormatError::DuplicateKey { ref key, .. }) if key == "twice"
    ));

    let json = json!({ "@@type@@": "vc_json::formatter::tests::Faulty, vc_json", "twice": 1 });
    let result = formatter.from_value(&json, None);
    assert!(matches!(result, Err(FormatError::MissingInitializer { .. })));
}

#[test]
fn surrogates_follow_the_context() {
    let registry = registry();
    let table = SurrogateTable::new().with::<Point>(ContextStates::FILE, PointSurrogate);
    let formatter = compact(&registry)
        .with_surrogate_selector(table)
        .with_context(StreamingContext::new(ContextStates::FILE));

    let point = Point { x: 1, y: 2 };
    let json = formatter.to_value(&point, Some(Point::type_info())).unwrap();
    assert_eq!(
        json,
        json!({
            "@@info@@": "root",
            "@@type@@": point_id(),
            "xy": {
                "@@info@@": "root.xy",
                "@@type@@": "alloc::string::String, alloc",
                "@@value@@": "1,2",
            },
        })
    );
    let back: Point = formatter.deserialize(&json.to_string()).unwrap();
    assert_eq!(back, point);

    let table = SurrogateTable::new().with::<Point>(ContextStates::REMOTING, PointSurrogate);
    let formatter = compact(&registry)
        .with_surrogate_selector(table)
        .with_context(StreamingContext::new(ContextStates::FILE));
    let json = formatter.to_value(&point, Some(Point::type_info())).unwrap();
    assert_eq!(json, json!({ "@@info@@": "root", "x": 1, "y": 2 }));
}

#[test]
fn converters() {
    let registry = registry();
    let formatter = compact(&registry);

    let address: SocketAddr = "127.0.0.1:8080".parse().unwrap();
    let json = formatter.to_value(&address, Some(SocketAddr::type_info())).unwrap();
    assert_eq!(json, json!("127.0.0.1:8080"));
    let back = formatter.from_value(&json, Some(SocketAddr::type_info()));
    assert_eq!(back.unwrap().unwrap().take::<SocketAddr>().ok(), Some(address));

    let tagged = formatter.to_value(&address, None).unwrap();
    let back = formatter.from_value(&tagged, None).unwrap().unwrap();
    assert_eq!(back.take::<SocketAddr>().ok(), Some(address));

    let labeled = Labeled {
        tag: Tag("blue".into()),
        weight: 3,
    };
    let json = formatter.to_value(&labeled, Some(Labeled::type_info())).unwrap();
    assert_eq!(json, json!({ "@@info@@": "root", "tag": "blue", "weight": 3 }));
    let back: Labeled = formatter.deserialize(&json.to_string()).unwrap();
    assert_eq!(back.tag, labeled.tag);

    let result = formatter.from_value(&json!({ "tag": "" }), Some(Labeled::type_info()));
    assert!(matches!(
        result,
        Err(FormatError::Convert { ref path, .. }) if path == "root.tag"
    ));
}

#[test]
fn formatter_converters_take_precedence() {
    let registry = registry();
    let formatter = compact(&registry).with_converter::<Point>(PointText);

    let line = Line {
        start: Point { x: 1, y: 2 },
        end: Point { x: -3, y: 4 },
    };
    let json = formatter.to_value(&line, Some(Line::type_info())).unwrap();
    assert_eq!(json, json!({ "@@info@@": "root", "start": "1;2", "end": "-3;4" }));

    let back: Line = formatter.deserialize(&json.to_string()).unwrap();
    assert_eq!(back, line);
}

#[test]
fn opaque_types_need_a_capability() {
    let registry = registry();
    let formatter = compact(&registry);

    let result = formatter.to_value(&Secret(1), None);
    assert!(matches!(
        result,
        Err(FormatError::NotSerializable { ref path, .. }) if path == "root"
    ));
}

// -----------------------------------------------------------------------------
// Object references and callbacks

#[test]
fn value_proxies_are_replaced() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = json!({ "@@type@@": "vc_json::formatter::tests::ValueProxy, vc_json", "x": 3 });
    let back = formatter.from_value(&json, None).unwrap().unwrap();
    assert_eq!(back.take::<Point>().ok(), Some(Point { x: 3, y: -3 }));
}

#[test]
fn bags_may_substitute_their_type() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = formatter.to_value(&Kelvin(300.0), Some(Kelvin::type_info())).unwrap();
    assert_eq!(
        json[crate::value::TYPE_KEY],
        "vc_json::formatter::tests::KelvinProxy, vc_json"
    );

    let back: Kelvin = formatter.deserialize(&json.to_string()).unwrap();
    assert!((back.0 - 300.0).abs() < 1e-9);
}

#[test]
fn shared_proxies_can_be_referenced() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = json!({
        "left": { "@@type@@": "vc_json::formatter::tests::SharedProxy, vc_json", "x": 4 },
        "right": { "@@reference@@": "root.left" },
    });
    let back = formatter
        .from_value(&json, Some(Pair::type_info()))
        .unwrap()
        .unwrap()
        .take::<Pair>()
        .unwrap();
    let (left, right) = (back.left.unwrap(), back.right.unwrap());
    assert!(Shared::ptr_eq(&left, &right));
    assert_eq!(*left.borrow(), Point { x: 4, y: 4 });
}

#[test]
fn callbacks_run_after_the_graph_is_complete() {
    let registry = registry();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let formatter = compact(&registry)
        .with_context(StreamingContext::new(ContextStates::ALL).with_additional(log.clone()));

    let leaf = Shared::new(Tracked {
        name: "c".into(),
        child: None,
    });
    let middle = Shared::new(Tracked {
        name: "b".into(),
        child: Some(leaf),
    });
    let root = Shared::new(Tracked {
        name: "a".into(),
        child: Some(middle),
    });

    let text = formatter.serialize(&root).unwrap();
    assert!(log.borrow().is_empty());

    let back: Shared<Tracked> = formatter.deserialize(&text).unwrap();
    assert_eq!(*log.borrow(), ["a>b", "b>c", "c>-"]);
    assert_eq!(back.borrow().name, "a");
}

#[test]
fn value_types_skip_callbacks() {
    let registry = registry();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let formatter = compact(&registry)
        .with_context(StreamingContext::new(ContextStates::ALL).with_additional(log.clone()));

    let back: Tracked = formatter
        .deserialize(r#"{"name":"solo","child":null}"#)
        .unwrap();
    assert_eq!(back.name, "solo");
    assert!(log.borrow().is_empty());
}

// -----------------------------------------------------------------------------
// Type identifiers

#[test]
fn assembly_styles() {
    let registry = registry();
    let point = Point { x: 1, y: 2 };

    let config = FormatterConfig {
        assembly_style: AssemblyStyle::Full,
        ..FormatterConfig::default()
    };
    let full = JsonFormatter::from_config(&registry, config);
    assert_eq!(full.assembly_style(), AssemblyStyle::Full);

    let json = full.to_value(&point, None).unwrap();
    let identifier = json[crate::value::TYPE_KEY].as_str().unwrap();
    assert!(identifier.starts_with(&format!("{}, Version=", point_id())));

    // Both styles read both forms.
    let simple = compact(&registry);
    for formatter in [&full, &simple] {
        let back = formatter.from_value(&json, None).unwrap().unwrap();
        assert_eq!(back.take::<Point>().ok(), Some(point.clone()));
    }
}

#[test]
fn undecidable_and_unresolved_types() {
    let registry = registry();
    let formatter = compact(&registry);

    let result = formatter.from_value(&json!({ "x": 1 }), None);
    assert!(matches!(
        result,
        Err(FormatError::UndecidableType { ref path }) if path == "root"
    ));

    let erased = Some(<Box<dyn Reflect>>::type_info());
    let result = formatter.from_value(&json!([1]), erased);
    assert!(matches!(result, Err(FormatError::UndecidableType { .. })));

    let json = json!({ "start": { "@@type@@": "demo::Missing, demo" } });
    let result = formatter.from_value(&json, Some(Line::type_info()));
    assert!(matches!(
        result,
        Err(FormatError::UnresolvedType { ref path, ref identifier })
            if path == "root.start" && identifier == "demo::Missing, demo"
    ));
}

#[test]
fn errors_carry_the_path() {
    let registry = registry();
    let formatter = compact(&registry);

    let json = json!({ "start": { "x": "abc" } });
    let error = formatter.from_value(&json, Some(Line::type_info())).unwrap_err();
    assert_eq!(error.path(), Some("root.start.x"));
}
