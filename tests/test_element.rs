use tagstream::element::TagTree;

#[test]
pub fn test_tag_path() {
    let to_test: Vec<(&str, Vec<&str>)> = vec![
        ("first", vec!["first"]),
        ("first/second", vec!["first", "second"]),
        ("first/second/third", vec!["first", "second", "third"]),
    ];
    for (path, names) in to_test {
        let mut tree = TagTree::new();
        let got = tree.tag(&names);
        assert_eq!(path, tree.path(got));

        let again = tree.tag(&names);
        assert_eq!(got, again);
        assert_eq!(path, tree.path(again));
        assert_eq!(names.len(), tree.len());
    }
}

#[test]
pub fn test_shared_prefix() {
    let mut tree = TagTree::new();
    let title = tree.tag(&["catalog", "book", "title"]);
    let author = tree.tag(&["catalog", "book", "author"]);
    assert_ne!(title, author);
    assert_eq!(tree.parent(title), tree.parent(author));
    assert_eq!(4, tree.len());

    let book = tree.find(&["catalog", "book"]).unwrap();
    assert!(tree.has_child(book, "title"));
    assert!(tree.has_child(book, "author"));
    assert!(!tree.has_child(book, "isbn"));
    assert_eq!(4, tree.len());
}

#[test]
pub fn test_tag_from() {
    let mut tree = TagTree::new();
    let book = tree.tag(&["catalog", "book"]);
    let title = tree.tag_from(book, &["title"]);
    assert_eq!("catalog/book/title", tree.path(title));
    assert_eq!(title, tree.tag(&["catalog", "book", "title"]));

    let empty: [&str; 0] = [];
    assert_eq!(book, tree.tag_from(book, &empty));
}

#[test]
pub fn test_root() {
    let mut tree = TagTree::new();
    assert!(tree.is_empty());
    let root = tree.root();
    assert_eq!("", tree.path(root));
    assert_eq!("", tree.tag_name(root));
    assert_eq!(None, tree.parent(root));

    let deep = tree.tag(&["a", "b", "c", "d"]);
    assert_eq!("d", tree.tag_name(deep));
    assert_eq!(root, tree.root_of(deep));
    assert_eq!(root, tree.root_of(root));
}

#[test]
pub fn test_find_does_not_create() {
    let mut tree = TagTree::new();
    tree.tag(&["a"]);
    assert_eq!(None, tree.find(&["a", "b"]));
    assert_eq!(None, tree.find(&["b"]));
    assert_eq!(1, tree.len());
    assert_eq!(Some(tree.root()), tree.find::<&str>(&[]));
}

#[test]
pub fn test_paths() {
    let mut tree = TagTree::new();
    tree.tag(&["b", "y"]);
    tree.tag(&["a", "z"]);
    tree.tag(&["b", "x"]);
    tree.tag(&["a"]);
    assert_eq!(vec!["a", "a/z", "b", "b/x", "b/y"], tree.paths());
}

#[test]
pub fn test_declare_path() {
    let mut tree = TagTree::new();
    let title = tree.declare_path("catalog/book/title");
    assert_eq!("catalog/book/title", tree.path(title));
    assert_eq!(title, tree.tag(&["catalog", "book", "title"]));
    assert_eq!(title, tree.declare_path("/catalog//book/title/"));
    assert_eq!(3, tree.len());
    assert_eq!(tree.root(), tree.declare_path(""));
}

#[test]
#[should_panic]
pub fn test_foreign_id_panics() {
    let mut large = TagTree::new();
    let deep = large.tag(&["a", "b", "c"]);
    let small = TagTree::new();
    small.tag_name(deep);
}
