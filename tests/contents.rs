use loopmount::DirContents;

#[test]
fn entries_come_back_in_append_order() {
    let mut contents = DirContents::new();
    let names = ["alpha", "beta", "gamma", "delta"];
    for name in names {
        contents.append(name);
    }

    assert_eq!(contents.len(), names.len());
    for (index, name) in names.iter().enumerate() {
        assert_eq!(contents.at(index), Some(*name));
    }
    let collected: Vec<&str> = contents.iter().collect();
    assert_eq!(collected, names);
}

#[test]
fn out_of_range_index_is_not_found() {
    let mut contents = DirContents::new();
    contents.append("only");

    assert_eq!(contents.at(1), None);
    assert_eq!(contents.at(usize::MAX), None);
}

#[test]
fn empty_list_is_safe_to_use_and_drop() {
    let contents = DirContents::new();
    assert!(contents.is_empty());
    assert_eq!(contents.len(), 0);
    assert_eq!(contents.at(0), None);
    drop(contents);
}

#[test]
fn append_stores_an_independent_copy() {
    let mut contents = DirContents::new();
    {
        let transient = String::from("ephemeral");
        contents.append(&transient);
    }
    assert_eq!(contents.at(0), Some("ephemeral"));
}

#[test]
fn collects_from_iterators_of_names() {
    let contents: DirContents = ["a", "b"].into_iter().collect();
    assert_eq!(contents.at(0), Some("a"));
    assert_eq!(contents.at(1), Some("b"));

    let grown: DirContents = (0..100).map(|i| format!("entry-{i}")).collect();
    assert_eq!(grown.len(), 100);
    assert_eq!(grown.at(99), Some("entry-99"));
}
