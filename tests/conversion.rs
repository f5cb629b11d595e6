use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rstest::rstest;
use textcast::core::{kinds, BoxError, Probe};
use textcast::{
    ConversionContext, ConversionEngine, ConversionError, Convertible, DynamicStrategy, EntryPoint,
    ErrorKind, TypeDescriptor, Value,
};

#[derive(Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl Point {
    fn new(text: String) -> Result<Self, String> {
        let (x, y) = text
            .split_once(',')
            .ok_or_else(|| format!("\"{text}\" has no comma"))?;
        let coordinate = |s: &str| s.trim().parse::<i32>().map_err(|e| e.to_string());
        Ok(Self {
            x: coordinate(x)?,
            y: coordinate(y)?,
        })
    }
}

impl Convertible for Point {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Point>().with_entry_points(|| vec![EntryPoint::constructor("new", Point::new)])
    }
}

#[derive(Debug, PartialEq)]
struct Port(u16);

impl Convertible for Port {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Port>().with_entry_points(|| {
            vec![EntryPoint::factory("from_number", |n: u16| {
                if n == 0 { Err("port 0 is reserved") } else { Ok(Port(n)) }
            })]
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::EnumString, strum::VariantNames)]
enum Level {
    Low,
    High,
}

impl Convertible for Level {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::enumeration::<Level>()
    }
}

#[test]
fn test_list_of_integers() {
    let engine = ConversionEngine::default();
    assert_eq!(engine.convert::<Vec<i32>>("1, 2, 3").unwrap(), Some(vec![1, 2, 3]));
}

#[rstest]
#[case("1,2,3", &[1, 2, 3])]
#[case(" 7 ", &[7])]
#[case("", &[])]
#[case("null", &[])]
#[case("-1, +1", &[-1, 1])]
fn test_integer_lists(#[case] input: &str, #[case] expected: &[i64]) {
    let engine = ConversionEngine::default();
    assert_eq!(engine.convert::<Vec<i64>>(input).unwrap().as_deref(), Some(expected));
}

#[test]
fn test_booleans() {
    let engine = ConversionEngine::default();
    assert_eq!(engine.convert::<bool>("true").unwrap(), Some(true));
    assert_eq!(engine.convert::<bool>("TRUE ").unwrap(), Some(true));

    let error = engine.convert::<bool>("maybe").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConversionFailed);
    assert!(error.to_string().ends_with("\"maybe\" is not parsable to a Boolean."));
    assert_eq!(
        error.to_string(),
        "cannot parse \"maybe\" to type bool because: \"maybe\" is not parsable to a Boolean."
    );
}

#[test]
fn test_map_of_integers() {
    let engine = ConversionEngine::default();
    let map = engine.convert::<HashMap<String, i32>>("a=1,b=2").unwrap().unwrap();
    assert_eq!(map, HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]));

    let map = engine.convert::<HashMap<String, i32>>("k=1,k=2").unwrap().unwrap();
    assert_eq!(map, HashMap::from([("k".to_string(), 2)]));
}

#[test]
fn test_null_marker_gives_empty_containers() {
    let engine = ConversionEngine::default();
    assert_eq!(engine.convert::<Vec<i32>>("null").unwrap(), Some(Vec::new()));
    assert_eq!(engine.convert::<BTreeSet<Level>>("null").unwrap(), Some(BTreeSet::new()));
    assert_eq!(engine.convert::<HashMap<String, i32>>(" null ").unwrap(), Some(HashMap::new()));
    assert_eq!(engine.convert::<[u8; 0]>("null").unwrap(), Some([]));
}

#[test]
fn test_null_marker_on_scalars() {
    let engine = ConversionEngine::default();
    assert_eq!(engine.convert_nullable::<i32>("null").unwrap(), None);
    assert_eq!(engine.convert::<String>("null").unwrap(), None);
    assert_eq!(engine.convert::<Point>("null").unwrap(), None);

    let error = engine.convert::<i32>("null").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NullOnPrimitive);
}

#[test]
fn test_null_element_cannot_be_stored() {
    let engine = ConversionEngine::default();

    let error = engine.convert::<Vec<i32>>("1,null").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NullOnPrimitive);

    let error = engine.convert::<Vec<String>>("a,null").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConversionFailed);
    assert!(error.message().contains("element 1"));
}

#[test]
fn test_point_constructor() {
    let engine = ConversionEngine::default();
    assert_eq!(engine.convert::<Point>("3,4").unwrap(), Some(Point { x: 3, y: 4 }));

    let error = engine.convert::<Point>("3;4").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConversionFailed);
    assert!(error.message().contains("Point::new(String)"));
    assert!(error.message().contains("\"3;4\""));
    assert_eq!(
        error.source().map(|source| source.to_string()),
        Some("\"3;4\" has no comma".to_string())
    );
}

#[test]
fn test_nested_user_types() {
    let engine = ConversionEngine::default();
    let ports = engine
        .convert::<HashMap<String, Vec<Port>>>("http=80,https=443")
        .unwrap()
        .unwrap();
    assert_eq!(ports["http"], vec![Port(80)]);
    assert_eq!(ports["https"], vec![Port(443)]);

    let error = engine.convert::<Vec<Port>>("80,0").unwrap_err();
    assert!(error.message().contains("Port::from_number(u16)"));
    assert_eq!(error.frame().map(|frame| frame.input()), Some("0"));
}

#[test]
fn test_error_keeps_inputs_and_innermost_type() {
    let engine = ConversionEngine::builder()
        .preprocessor(|input: &str| -> Result<String, BoxError> {
            Ok(input.trim_start_matches('[').trim_end_matches(']').to_string())
        })
        .build()
        .unwrap();

    let error = engine.convert::<Vec<i32>>("[1,x]").unwrap_err();
    assert_eq!(error.original_input(), Some("[1,x]"));
    assert_eq!(error.preprocessed_input(), Some("1,x"));
    assert_eq!(error.descriptor(), Some(&TypeDescriptor::of::<i32>()));
    assert_eq!(
        error.to_string(),
        "cannot parse \"[1,x]\" to type Vec<i32> because: \"x\" is not a valid i32 number."
    );
}

#[test]
fn test_failing_preprocessor() {
    let engine = ConversionEngine::builder()
        .preprocessor(|_: &str| -> Result<String, BoxError> { Err("unbalanced brackets".into()) })
        .build()
        .unwrap();
    let error = engine.convert::<i32>("[1").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::PreprocessingFailed);
    assert_eq!(error.preprocessed_input(), None);
}

#[test]
fn test_preprocessor_runs_once_per_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let engine = ConversionEngine::builder()
        .preprocessor(move |input: &str| -> Result<String, BoxError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(input.to_string())
        })
        .build()
        .unwrap();

    engine.convert::<HashMap<String, Vec<Port>>>("a=1,b=2").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

struct FixedList;

impl DynamicStrategy for FixedList {
    fn name(&self) -> &str {
        "fixed-list"
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, _probe: &Probe<'_>) -> Result<bool, ConversionError> {
        Ok(*descriptor == TypeDescriptor::of::<Vec<i32>>())
    }

    fn convert(&self, _context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        Ok(Some(Value::new(vec![42_i32])))
    }
}

#[test]
fn test_client_strategy_runs_before_builtins() {
    let engine = ConversionEngine::builder().register_strategy(FixedList).build().unwrap();
    assert_eq!(engine.convert::<Vec<i32>>("1,2").unwrap(), Some(vec![42]));
    assert_eq!(engine.convert::<Vec<i64>>("1,2").unwrap(), Some(vec![1, 2]));
}

#[test]
fn test_assignable_converter_precedence() {
    let engine = ConversionEngine::builder()
        .register_assignable::<kinds::List, _>(
            |input: &str, _context: &ConversionContext<'_>| -> Result<Value, BoxError> {
                Ok(Value::new(vec![input.to_uppercase()]))
            },
        )
        .build()
        .unwrap();
    assert_eq!(
        engine.convert::<Vec<String>>("a,b").unwrap(),
        Some(vec!["A,B".to_string()])
    );

    let engine = ConversionEngine::builder()
        .register_assignable::<kinds::List, _>(
            |input: &str, _context: &ConversionContext<'_>| -> Result<Value, BoxError> {
                Ok(Value::new(vec![input.to_uppercase()]))
            },
        )
        .register(|input: &str| Ok::<_, BoxError>(vec![input.len().to_string()]))
        .build()
        .unwrap();
    assert_eq!(engine.convert::<Vec<String>>("a,b").unwrap(), Some(vec!["3".to_string()]));
}

#[test]
fn test_assignable_converter_with_wrong_output_is_reported() {
    let engine = ConversionEngine::builder()
        .register_assignable::<kinds::Set, _>(
            |_: &str, _context: &ConversionContext<'_>| -> Result<Value, BoxError> { Ok(Value::new(1_u8)) },
        )
        .build()
        .unwrap();
    let error = engine.convert::<BTreeSet<i32>>("1").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConversionFailed);
    assert!(error.message().contains("produced a u8"));
}

#[test]
fn test_custom_null_marker() {
    let engine = ConversionEngine::builder()
        .null_marker(|trimmed: &str| trimmed.is_empty() || trimmed == "-")
        .build()
        .unwrap();
    assert_eq!(engine.convert::<String>("  ").unwrap(), None);
    assert_eq!(engine.convert::<String>("null").unwrap(), Some("null".to_string()));
    assert_eq!(engine.convert::<Vec<i32>>("-").unwrap(), Some(Vec::new()));
}

#[test]
fn test_type_names_and_enum_sets() {
    let engine = ConversionEngine::builder().register_type::<Level>().build().unwrap();
    let descriptor = engine.convert::<TypeDescriptor>("Level").unwrap().unwrap();
    assert_eq!(descriptor, Level::descriptor());

    let levels = engine.convert_type("High,Low,High", &TypeDescriptor::of::<BTreeSet<Level>>()).unwrap();
    let levels = levels.and_then(Value::downcast::<BTreeSet<Level>>).unwrap();
    assert_eq!(levels.into_iter().collect::<Vec<_>>(), vec![Level::Low, Level::High]);
}

#[test]
fn test_is_convertible_is_stable() {
    let engine = ConversionEngine::default();
    for _ in 0..3 {
        assert!(engine.is_convertible::<HashMap<String, Vec<Port>>>());
        assert!(engine.is_convertible::<[Point; 2]>());
        assert!(!engine.is_type_convertible(&TypeDescriptor::scalar::<std::time::Instant>()));
    }
}

#[test]
fn test_uuid_round_trip() {
    let engine = ConversionEngine::default();
    let id = uuid::Uuid::new_v4();
    assert_eq!(engine.convert::<uuid::Uuid>(&format!(" {id} ")).unwrap(), Some(id));
}

#[test]
fn test_engine_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConversionEngine>();

    let engine = ConversionEngine::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let engine = &engine;
                scope.spawn(move || {
                    let input = format!("{n},{}", n + 1);
                    engine.convert::<Vec<i64>>(&input).unwrap().unwrap()
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let n = n as i64;
            assert_eq!(handle.join().unwrap(), vec![n, n + 1]);
        }
    });
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct Opaque;

impl Convertible for Opaque {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Opaque>()
    }
}

#[test]
fn test_containers_of_unconvertible_types_are_not_convertible() {
    let engine = ConversionEngine::default();
    assert!(!engine.is_convertible::<Vec<Opaque>>());
    assert!(!engine.is_convertible::<HashMap<String, Opaque>>());
    assert!(!engine.is_convertible::<HashMap<Opaque, i32>>());
    assert!(!engine.is_convertible::<[Opaque; 2]>());

    let error = engine.convert::<Vec<Opaque>>("a,b").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NoStrategyFound);
}

fn tagged(tag: &'static str) -> impl Fn(&str, &ConversionContext<'_>) -> Result<Value, BoxError> + Send + Sync {
    move |_: &str, _context: &ConversionContext<'_>| -> Result<Value, BoxError> { Ok(Value::new(vec![tag.to_string()])) }
}

#[test]
fn test_first_registered_assignable_supertype_wins() {
    let engine = ConversionEngine::builder()
        .register_assignable::<kinds::Collection, _>(tagged("collection"))
        .register_assignable::<kinds::List, _>(tagged("list"))
        .build()
        .unwrap();
    assert_eq!(engine.convert::<Vec<String>>("a").unwrap(), Some(vec!["collection".to_string()]));

    let engine = ConversionEngine::builder()
        .register_assignable::<kinds::List, _>(tagged("list"))
        .register_assignable::<kinds::Collection, _>(tagged("collection"))
        .build()
        .unwrap();
    assert_eq!(engine.convert::<Vec<String>>("a").unwrap(), Some(vec!["list".to_string()]));
}

#[test]
fn test_unregistered_assignable_converter_is_not_used() {
    let engine = ConversionEngine::builder()
        .register_assignable::<kinds::List, _>(tagged("list"))
        .unregister_assignable::<kinds::List>()
        .build()
        .unwrap();
    assert_eq!(
        engine.convert::<Vec<String>>("a,b").unwrap(),
        Some(vec!["a".to_string(), "b".to_string()])
    );
}

trait Unit {}

#[derive(Debug, PartialEq)]
struct Meters(f64);

impl Unit for Meters {}

impl Convertible for Meters {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Meters>().implements::<dyn Unit>()
    }
}

#[test]
fn test_assignable_converter_for_user_trait() {
    let engine = ConversionEngine::builder()
        .register_assignable::<dyn Unit, _>(
            |input: &str, _context: &ConversionContext<'_>| -> Result<Value, BoxError> {
                Ok(Value::new(Meters(input.trim().parse::<f64>()?)))
            },
        )
        .build()
        .unwrap();
    assert!(engine.is_convertible::<Meters>());
    assert_eq!(engine.convert::<Meters>(" 2.5 ").unwrap(), Some(Meters(2.5)));
    assert_eq!(engine.convert::<Vec<Meters>>("1,2").unwrap(), Some(vec![Meters(1.0), Meters(2.0)]));

    let engine = ConversionEngine::default();
    assert!(!engine.is_convertible::<Meters>());
}

type Wrap8<T> = Vec<Vec<Vec<Vec<Vec<Vec<Vec<Vec<T>>>>>>>>;
type Deep = Wrap8<Wrap8<Wrap8<Wrap8<Wrap8<Wrap8<Wrap8<Wrap8<Wrap8<i32>>>>>>>>>;

#[test]
fn test_nesting_beyond_depth_limit_is_rejected() {
    let engine = ConversionEngine::default();
    assert!(engine.is_convertible::<Wrap8<Wrap8<i32>>>());
    assert!(!engine.is_convertible::<Deep>());

    let error = engine.convert::<Deep>("1").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CyclicTypeArgument);
    assert!(error.message().contains("exceeded 64"));
}
