use std::sync::Arc;
use std::thread;

use gnuopt::{parse, BoxError, OptionMap, ParseError, Value};

fn map(pairs: &[(&str, &str)]) -> OptionMap {
    pairs.iter().copied().collect()
}

fn s(v: &str) -> Value {
    Value::Str(v.to_string())
}

fn parse_interval(raw: &str, _origin: &str) -> Result<Value, BoxError> {
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .filter(|&i| i > 0)
        .ok_or_else(|| format!("{} is invalid", raw))?;
    let (n, unit) = raw.split_at(split);
    if !matches!(unit, "h" | "m" | "H" | "M") {
        return Err(format!("{} is invalid", raw).into());
    }
    Ok(Value::List(vec![Value::Integer(n.parse()?), s(unit)]))
}

// -- successful parses --

#[test]
fn posix_cluster() {
    let m = map(&[("a", "switch"), ("b", "switch"), ("c", "string")]);
    let p = parse(["able", "baker", "-abc", "charlie"], &m).unwrap();
    assert_eq!(p.positional(), ["able", "baker"]);
    assert_eq!(p.get("a"), Some(&Value::Count(1)));
    assert_eq!(p.get("b"), Some(&Value::Count(1)));
    assert_eq!(p.get("c"), Some(&s("charlie")));
    assert_eq!(p.len(), 3);
}

#[test]
fn cluster_equals_separate_flags() {
    let m = map(&[("a", "switch"), ("b", "switch"), ("c", "string")]);
    let clustered = parse(["-abc", "x"], &m).unwrap();
    let separate = parse(["-a", "-b", "-c", "x"], &m).unwrap();
    assert_eq!(clustered, separate);
}

#[test]
fn string_options() {
    let m = map(&[("a", "string"), ("b", "string"), ("c", "string")]);
    let p = parse(["-a", "able", "-b", "baker", "-c", "charlie"], &m).unwrap();
    assert!(p.positional().is_empty());
    assert_eq!(p.get("a"), Some(&s("able")));
    assert_eq!(p.get("b"), Some(&s("baker")));
    assert_eq!(p.get("c"), Some(&s("charlie")));
}

#[test]
fn string_options_between_paths() {
    let m = map(&[("a", "string"), ("b", "string")]);
    let p = parse(
        ["path0", "-a", "able", "path1", "-b", "baker", "path2"],
        &m,
    )
    .unwrap();
    assert_eq!(p.positional(), ["path0", "path1", "path2"]);
    assert_eq!(p.get("a"), Some(&s("able")));
    assert_eq!(p.get("b"), Some(&s("baker")));
}

#[test]
fn no_flags_keeps_every_token_positional() {
    let args = ["one", "two", "three", "", "  "];
    let p = parse(args, &OptionMap::new()).unwrap();
    assert_eq!(p.positional(), args);
    assert_eq!(p.len(), 0);
}

#[test]
fn number_options() {
    let m = map(&[("a", "number"), ("b", "integer")]);
    let p = parse(["-a", "1.23", "-b", "4"], &m).unwrap();
    assert_eq!(p.get("a"), Some(&Value::Number(1.23)));
    assert_eq!(p.get("b"), Some(&Value::Integer(4)));
}

#[test]
fn custom_type() {
    let m = OptionMap::new().custom("interval", "interval", parse_interval);
    let p = parse(["--interval", "30m"], &m).unwrap();
    assert_eq!(
        p.get("interval"),
        Some(&Value::List(vec![Value::Integer(30), s("m")]))
    );
}

#[test]
fn long_options_through_aliases() {
    let m = map(&[("able", "*string"), ("a", "&ab"), ("ab", "&able")]);
    let p = parse(["--able", "able1", "-a", "able2", "--ab", "able3"], &m).unwrap();
    assert_eq!(
        p.get("able"),
        Some(&Value::List(vec![s("able1"), s("able2"), s("able3")]))
    );
    assert_eq!(p.len(), 1);
}

#[test]
fn long_options_with_equal_sign() {
    let m = map(&[("able", "*string"), ("a", "&ab"), ("ab", "&able")]);
    let p = parse(["--able=able1", "-a", "able2", "--ab=able3"], &m).unwrap();
    assert_eq!(
        p.get("able"),
        Some(&Value::List(vec![s("able1"), s("able2"), s("able3")]))
    );
}

#[test]
fn equal_sign_form_matches_two_token_form() {
    let m = map(&[("able", "string")]);
    assert_eq!(
        parse(["--able=x"], &m).unwrap(),
        parse(["--able", "x"], &m).unwrap()
    );
}

#[test]
fn alias_is_transparent() {
    let direct = map(&[("t", "integer")]);
    let aliased = map(&[("t", "integer"), ("x", "&y"), ("y", "&t")]);
    assert_eq!(
        parse(["-t", "5", "rest"], &direct).unwrap(),
        parse(["-x", "5", "rest"], &aliased).unwrap()
    );
}

#[test]
fn slurp_string() {
    let m = map(&[("a", "string"), ("c", "~string")]);
    let p = parse(["-a", "able", "-c", "baker", "--charlie"], &m).unwrap();
    assert!(p.positional().is_empty());
    assert_eq!(p.get("a"), Some(&s("able")));
    assert_eq!(
        p.get("c"),
        Some(&Value::List(vec![s("baker"), s("--charlie")]))
    );
}

#[test]
fn slurp_keeps_equal_sign_split() {
    let m = map(&[("c", "~string")]);
    let p = parse(["-c", "--x=1"], &m).unwrap();
    assert_eq!(p.get("c"), Some(&Value::List(vec![s("--x"), s("1")])));
}

#[test]
fn slurp_integer() {
    let m = map(&[("a", "string"), ("c", "~integer")]);
    let p = parse(["-a", "able", "-c", "1", "2"], &m).unwrap();
    assert_eq!(
        p.get("c"),
        Some(&Value::List(vec![Value::Integer(1), Value::Integer(2)]))
    );
}

#[test]
fn wildcard() {
    let m = map(&[("a", "switch"), ("b", "switch"), ("-", "number")]);
    let p = parse(["able", "baker", "-abc", "1", "-d", "2"], &m).unwrap();
    assert_eq!(p.positional(), ["able", "baker"]);
    assert_eq!(p.count("a"), 1);
    assert_eq!(p.count("b"), 1);
    assert_eq!(p.get("c"), Some(&Value::Number(1.0)));
    assert_eq!(p.get("d"), Some(&Value::Number(2.0)));
}

#[test]
fn repeated_switch_counts_occurrences() {
    let m = map(&[
        ("a", "*switch"),
        ("able", "&a"),
        ("c", "*switch"),
        ("d", "*switch"),
    ]);
    let p = parse(
        ["-cccddd", "filename1", "--able", "-dda", "filename2"],
        &m,
    )
    .unwrap();
    assert_eq!(p.positional(), ["filename1", "filename2"]);
    assert_eq!(p.count("a"), 2);
    assert_eq!(p.count("c"), 3);
    assert_eq!(p.count("d"), 5);
    assert!(!p.contains("able"));
}

#[test]
fn switch_counting_cluster_and_separate_agree() {
    let m = map(&[("a", "*switch")]);
    let clustered = parse(["-aaa"], &m).unwrap();
    let separate = parse(["-a", "-a", "-a"], &m).unwrap();
    assert_eq!(clustered.count("a"), 3);
    assert_eq!(clustered, separate);
}

#[test]
fn result_serializes_like_an_object() {
    let m = map(&[("a", "switch"), ("c", "~integer")]);
    let p = parse(["pos", "-a", "-c", "1", "2"], &m).unwrap();
    assert_eq!(
        serde_json::to_string(&p).unwrap(),
        r#"{"$":["pos"],"a":1,"c":[1,2]}"#
    );
}

#[test]
fn map_shared_between_threads() {
    let m = Arc::new(map(&[("n", "*integer"), ("v", "*switch")]));
    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                let n = i.to_string();
                let p = parse(["-vv", "-n", n.as_str()], &m).unwrap();
                (p.count("v"), p.get_as::<Vec<i64>>("n").unwrap())
            })
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        let (v, n) = h.join().unwrap();
        assert_eq!(v, 2);
        assert_eq!(n, vec![i as i64]);
    }
}

// -- failures --

#[test]
fn missing_value_before_next_flag() {
    let m = map(&[("n", "string"), ("b", "string")]);
    match parse(["-n", "-b"], &m) {
        Err(ParseError::InvalidValue {
            option,
            ty,
            value,
            inner,
        }) => {
            assert_eq!(option, "n");
            assert_eq!(ty, "string");
            assert_eq!(value, None);
            assert!(inner.is_none());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_value_at_end() {
    let m = map(&[("n", "string"), ("b", "string")]);
    match parse(["-n", "noproblem", "-b"], &m) {
        Err(ParseError::InvalidValue {
            option, ty, value, ..
        }) => {
            assert_eq!(option, "b");
            assert_eq!(ty, "string");
            assert_eq!(value, None);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn invalid_number_through_alias() {
    let m = map(&[("n", "&number"), ("number", "number")]);
    match parse(["-n", "string"], &m) {
        Err(ParseError::InvalidValue {
            option, ty, value, ..
        }) => {
            assert_eq!(option, "n");
            assert_eq!(ty, "number");
            assert_eq!(value.as_deref(), Some("string"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn invalid_integer_through_alias() {
    let m = map(&[("n", "&number"), ("number", "integer")]);
    match parse(["-n", "string"], &m) {
        Err(ParseError::InvalidValue {
            option, ty, value, ..
        }) => {
            assert_eq!(option, "n");
            assert_eq!(ty, "integer");
            assert_eq!(value.as_deref(), Some("string"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_string_through_alias() {
    let m = map(&[("s", "&str"), ("str", "string")]);
    match parse(["-s"], &m) {
        Err(ParseError::InvalidValue {
            option, ty, value, ..
        }) => {
            assert_eq!(option, "s");
            assert_eq!(ty, "string");
            assert_eq!(value, None);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn slurp_switch_rejects_values() {
    let m = map(&[("s", "~switch")]);
    match parse(["-s", "use"], &m) {
        Err(ParseError::InvalidValue {
            option, ty, value, ..
        }) => {
            assert_eq!(option, "s");
            assert_eq!(ty, "switch");
            assert_eq!(value.as_deref(), Some("use"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn custom_type_failure() {
    let m = OptionMap::new().custom("interval", "interval", parse_interval);
    match parse(["--interval", "30k"], &m) {
        Err(ParseError::InvalidValue {
            option,
            ty,
            value,
            inner,
        }) => {
            assert_eq!(option, "interval");
            assert_eq!(ty, "interval");
            assert_eq!(value.as_deref(), Some("30k"));
            assert_eq!(
                inner.map(|e| e.to_string()).as_deref(),
                Some("30k is invalid")
            );
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn unknown_type_name() {
    let m = map(&[("d", "unknownType")]);
    match parse(["-d", "unkownValue"], &m) {
        Err(ParseError::UndefinedType { option, ty }) => {
            assert_eq!(option, "d");
            assert_eq!(ty.as_deref(), Some("unknownType"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn undeclared_option() {
    match parse(["-d"], &OptionMap::new()) {
        Err(ParseError::UndefinedType { option, ty }) => {
            assert_eq!(option, "d");
            assert_eq!(ty, None);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn unreachable_reference_ignores_wildcard() {
    let m = map(&[("d", "&unkown"), ("-", "switch")]);
    match parse(["-d"], &m) {
        Err(ParseError::UndefinedType { option, ty }) => {
            assert_eq!(option, "d");
            assert_eq!(ty.as_deref(), Some("&unkown"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn repeated_option_without_sign() {
    let m = map(&[("a", "string")]);
    match parse(["-a", "str1", "-a", "str2"], &m) {
        Err(ParseError::InvalidRepetition { option }) => assert_eq!(option, "a"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn repeated_bare_switch_is_a_repetition() {
    let m = map(&[("v", "switch")]);
    let err = parse(["-vv"], &m).unwrap_err();
    assert_eq!(err.kind(), "InvalidRepetition");
}

#[test]
fn repetition_reports_alias_origin() {
    let m = map(&[("verbose", "string"), ("V", "&verbose")]);
    match parse(["--verbose", "x", "-V", "y"], &m) {
        Err(ParseError::InvalidRepetition { option }) => assert_eq!(option, "V"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn circular_reference() {
    let m = map(&[("a", "&b"), ("b", "&c"), ("c", "&a")]);
    match parse(["-a"], &m) {
        Err(ParseError::CircularReference { option, route }) => {
            assert_eq!(option, "a");
            assert_eq!(route, ["a", "b", "c", "a"]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn first_error_aborts() {
    // The repetition on `-a` comes before the bad integer.
    let m = map(&[("a", "string"), ("n", "integer")]);
    let err = parse(["-a", "x", "-a", "y", "-n", "bad"], &m).unwrap_err();
    assert_eq!(err.kind(), "InvalidRepetition");
}

#[test]
fn dollar_flag_keeps_positional_list() {
    let m = map(&[("-", "switch")]);
    assert_eq!(parse(["pos", "-$"], &m).unwrap_err().kind(), "InvalidRepetition");
    assert_eq!(
        parse(["pos", "--$"], &m).unwrap_err().kind(),
        "InvalidRepetition"
    );
}
