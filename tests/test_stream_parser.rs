use std::cell::RefCell;
use std::rc::Rc;

use tagstream::error::XmlError;
use tagstream::handler::XmlStreamHandler;
use tagstream::tokenstream::TokenStream;
use tagstream::{parse_str, Mode, StreamParser, TagTree};

type Calls = Rc<RefCell<Vec<String>>>;

fn record(parser: &mut StreamParser, path: &[&str], calls: &Calls) {
    let id = parser.tag(path);
    let name = path.join("/");
    let (enter, data, exit) = (calls.clone(), calls.clone(), calls.clone());
    let (enter_name, data_name, exit_name) = (name.clone(), name.clone(), name);
    parser
        .on_enter(id, move |_| {
            enter.borrow_mut().push(format!("{}-enter", enter_name));
            Ok(())
        })
        .on_data(id, move |text| {
            data.borrow_mut().push(format!("{}-data({})", data_name, text));
            Ok(())
        })
        .on_exit(id, move || {
            exit.borrow_mut().push(format!("{}-exit", exit_name));
            Ok(())
        });
}

#[test]
pub fn test_lenient_extends_tree() {
    let mut parser = StreamParser::lenient();
    parse_str("<a><b>x</b></a>", &mut parser).unwrap();
    let tree = parser.tree();
    assert!(tree.find(&["a"]).is_some());
    assert!(tree.find(&["a", "b"]).is_some());
    assert_eq!(2, tree.len());
    assert_eq!(parser.root(), parser.current());
}

#[test]
pub fn test_lenient_keeps_declared_callbacks() {
    let calls = Calls::default();
    let mut parser = StreamParser::lenient();
    record(&mut parser, &["a", "b"], &calls);
    parse_str("<a><unknown><b>in unknown</b></unknown><b>declared</b></a>", &mut parser).unwrap();
    assert_eq!(vec!["a/b-enter", "a/b-data(declared)", "a/b-exit"], *calls.borrow());
    assert!(parser.tree().find(&["a", "unknown", "b"]).is_some());
}

#[test]
pub fn test_strict_rejects_undeclared_child() {
    let calls = Calls::default();
    let mut parser = StreamParser::strict();
    parser.tag(&["a"]);
    let b = parser.tree_mut().tag(&["x", "b"]);
    let seen = calls.clone();
    parser.on_enter(b, move |_| {
        seen.borrow_mut().push("b-enter".to_string());
        Ok(())
    });

    match parse_str("<a><b/></a>", &mut parser) {
        Err(XmlError::UnexpectedTransition { parent, child }) => {
            assert_eq!("a", parent);
            assert_eq!("b", child);
        }
        other => panic!("expected unexpected transition, got {:?}", other),
    }
    assert!(calls.borrow().is_empty());
    assert_eq!("a", parser.tree().path(parser.current()));
    assert!(parser.tree().find(&["a", "b"]).is_none());
}

#[test]
pub fn test_strict_rejects_undeclared_root() {
    let mut parser = StreamParser::strict();
    let err = parse_str("<doc/>", &mut parser).unwrap_err();
    assert_eq!("doc", err.get_target());
    assert_eq!("unexpected transition: .doc", err.to_string());
}

#[test]
pub fn test_close_tag_mismatch() {
    let calls = Calls::default();
    let mut parser = StreamParser::lenient();
    record(&mut parser, &["a"], &calls);

    match parse_str("<a><b></a>", &mut parser) {
        Err(XmlError::UnexpectedTag { closing, current }) => {
            assert_eq!("a", closing);
            assert_eq!("b", current);
        }
        other => panic!("expected unexpected tag, got {:?}", other),
    }
    assert_eq!(vec!["a-enter"], *calls.borrow());
    assert_eq!("a/b", parser.tree().path(parser.current()));
}

#[test]
pub fn test_enter_data_exit_order() {
    let calls = Calls::default();
    let mut parser = StreamParser::strict();
    parser.tag(&["root"]);
    record(&mut parser, &["root", "item"], &calls);

    let xml = "<root><item>X</item></root>";
    let mut stream = TokenStream::from(xml);
    for _ in 0..4 {
        let token = stream.next_token().unwrap().unwrap();
        parser.process_token(&token).unwrap();
    }
    assert_eq!(vec!["root/item-enter", "root/item-data(X)", "root/item-exit"], *calls.borrow());
    assert_eq!("root", parser.tree().path(parser.current()));

    let token = stream.next_token().unwrap().unwrap();
    parser.process_token(&token).unwrap();
    assert_eq!(parser.root(), parser.current());
    assert!(stream.next_token().unwrap().is_none());
}

#[test]
pub fn test_data_is_not_concatenated() {
    let calls = Calls::default();
    let mut parser = StreamParser::strict();
    record(&mut parser, &["item"], &calls);
    parse_str("<item>a<![CDATA[b]]>c</item>", &mut parser).unwrap();
    assert_eq!(
        vec!["item-enter", "item-data(a)", "item-data(b)", "item-data(c)", "item-exit"],
        *calls.borrow()
    );
}

#[test]
pub fn test_passive_events() {
    let calls = Calls::default();
    let mut parser = StreamParser::strict();
    parser.tag(&["root"]);
    record(&mut parser, &["root", "item"], &calls);
    let xml = "<?xml version=\"1.0\"?><!DOCTYPE root><root><!--comment--><?pi data?><item>X</item></root>";
    parse_str(xml, &mut parser).unwrap();
    assert_eq!(vec!["root/item-enter", "root/item-data(X)", "root/item-exit"], *calls.borrow());
}

#[test]
pub fn test_enter_receives_attributes() {
    let seen = Rc::new(RefCell::new(None));
    let mut parser = StreamParser::strict();
    let book = parser.tag(&["catalog", "book"]);
    let target = seen.clone();
    parser.on_enter(book, move |element| {
        assert_eq!("book", element.name.local);
        *target.borrow_mut() = element.attribute("id").map(|id| id.to_string());
        Ok(())
    });
    parse_str("<catalog><book id=\"b&amp;1\"/></catalog>", &mut parser).unwrap();
    assert_eq!(Some("b&1".to_string()), *seen.borrow());
}

#[test]
pub fn test_exit_error_still_ascends() {
    let mut parser = StreamParser::strict();
    let root = parser.tag(&["root"]);
    let item = parser.tag(&["root", "item"]);
    parser.on_exit(item, || Err("exit failed".into()));

    match parse_str("<root><item/></root>", &mut parser) {
        Err(XmlError::Callback(err)) => assert_eq!("exit failed", err.to_string()),
        other => panic!("expected callback error, got {:?}", other),
    }
    assert_eq!(root, parser.current());
}

#[test]
pub fn test_enter_error_keeps_cursor() {
    let mut parser = StreamParser::strict();
    let item = parser.tag(&["root", "item"]);
    parser.on_enter(item, |_| Err("enter failed".into()));

    let err = parse_str("<root><item/></root>", &mut parser).unwrap_err();
    assert_eq!("enter failed", err.to_string());
    assert_eq!(item, parser.current());
}

#[test]
pub fn test_data_error_stops_processing() {
    let calls = Calls::default();
    let mut parser = StreamParser::strict();
    let item = parser.tag(&["root", "item"]);
    parser.on_data(item, |_| Err("bad data".into()));
    let after = parser.tag(&["root", "after"]);
    let seen = calls.clone();
    parser.on_enter(after, move |_| {
        seen.borrow_mut().push("after-enter".to_string());
        Ok(())
    });

    assert!(matches!(
        parse_str("<root><item>X</item><after/></root>", &mut parser),
        Err(XmlError::Callback(_))
    ));
    assert!(calls.borrow().is_empty());
    assert_eq!(item, parser.current());
}

#[test]
pub fn test_last_callback_wins() {
    let calls = Calls::default();
    let mut parser = StreamParser::strict();
    let item = parser.tag(&["item"]);
    let first = calls.clone();
    parser.on_exit(item, move || {
        first.borrow_mut().push("first".to_string());
        Ok(())
    });
    let second = calls.clone();
    parser.on_exit(item, move || {
        second.borrow_mut().push("second".to_string());
        Ok(())
    });
    parse_str("<item/>", &mut parser).unwrap();
    assert_eq!(vec!["second"], *calls.borrow());
}

#[test]
pub fn test_parse_sets_all_callbacks() {
    let calls = Calls::default();
    let mut parser = StreamParser::strict();
    let (enter, data, exit) = (calls.clone(), calls.clone(), calls.clone());
    let doc = parser.parse(
        "doc",
        move |_| {
            enter.borrow_mut().push("enter".to_string());
            Ok(())
        },
        move |text| {
            data.borrow_mut().push(text.to_string());
            Ok(())
        },
        move || {
            exit.borrow_mut().push("exit".to_string());
            Ok(())
        },
    );
    assert_eq!("doc", parser.tree().path(doc));
    parse_str("<doc>body</doc>", &mut parser).unwrap();
    assert_eq!(vec!["enter", "body", "exit"], *calls.borrow());
}

#[test]
pub fn test_prepared_tree() {
    let mut tree = TagTree::new();
    tree.tag(&["feed", "entry", "title"]);
    let mut parser = StreamParser::with_tree(tree, Mode::Strict);
    assert_eq!(Mode::Strict, parser.mode());
    parse_str("<feed><entry><title>t</title></entry><entry/></feed>", &mut parser).unwrap();
    assert_eq!(3, parser.into_tree().len());
}

#[test]
pub fn test_prefixed_tags_match_local_name() {
    let calls = Calls::default();
    let mut parser = StreamParser::strict();
    record(&mut parser, &["feed"], &calls);
    parse_str("<atom:feed xmlns:atom=\"http://www.w3.org/2005/Atom\">x</atom:feed>", &mut parser).unwrap();
    assert_eq!(vec!["feed-enter", "feed-data(x)", "feed-exit"], *calls.borrow());
}
