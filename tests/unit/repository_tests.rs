/*!
 * Tests for dictionary directory loading and lookup layering
 */

use anyhow::Result;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use vocasub::repository;

use crate::common;

/// Test that a later file overrides an earlier one for the same key
#[test]
fn test_load_from_dir_with_duplicate_keys_should_keep_later_file() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_dictionary_file(root, "en", "a.txt", "Greeting\tfirst\n")?;
    common::write_dictionary_file(root, "en", "b.txt", "Greeting\tsecond\n")?;

    let (snapshot, summary) = repository::load_from_dir(&root.join("en").join("Text"), None);

    assert_eq!(summary.files_processed, 2);
    assert_eq!(snapshot.lookup("Greeting"), ("second".to_string(), true));
    Ok(())
}

/// Test that txt and csv files contribute to the same snapshot
#[test]
fn test_load_from_dir_with_mixed_formats_should_merge() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_dictionary_file(root, "en", "terms.txt", "Hello\tBonjour\n")?;
    common::write_dictionary_file(
        root,
        "en",
        "glossary.csv",
        "Term,Original,Translation\nWorld,,Monde\n",
    )?;

    let (snapshot, summary) = repository::load_from_dir(&root.join("en").join("Text"), None);

    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.entries_loaded, 2);
    assert_eq!(snapshot.lookup("Hello").0, "Bonjour");
    assert_eq!(snapshot.lookup("World").0, "Monde");
    Ok(())
}

/// Test that a missing directory degrades to an empty snapshot
#[test]
fn test_load_from_dir_with_missing_dir_should_return_empty() {
    let (snapshot, summary) =
        repository::load_from_dir(Path::new("/no/such/dictionary/dir"), None);

    assert!(snapshot.is_empty());
    assert_eq!(summary.files_processed, 0);
    assert_eq!(summary.entries_loaded, 0);
}

/// Test that comments are free to skip while malformed lines are counted
#[test]
fn test_load_from_dir_with_malformed_lines_should_count_skips() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_dictionary_file(
        root,
        "en",
        "dict.txt",
        "; comment line\n\nno tab here\nKey\tValue\n",
    )?;

    let (snapshot, summary) = repository::load_from_dir(&root.join("en").join("Text"), None);

    assert_eq!(summary.entries_loaded, 1);
    assert_eq!(summary.lines_skipped, 1);
    assert_eq!(snapshot.lookup("Key").0, "Value");
    Ok(())
}

/// Test that a pre-set cancel flag stops the pass before any file
#[test]
fn test_load_from_dir_with_cancel_set_should_stop_early() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_dictionary_file(root, "en", "dict.txt", "Hello\tBonjour\n")?;

    let cancel = AtomicBool::new(true);
    let (snapshot, summary) =
        repository::load_from_dir(&root.join("en").join("Text"), Some(&cancel));

    assert!(snapshot.is_empty());
    assert_eq!(summary.files_processed, 0);
    Ok(())
}

/// Test that regex rules loaded from a file apply when no term matches
#[test]
fn test_load_from_dir_with_regex_rule_should_apply_on_miss() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_dictionary_file(
        root,
        "en",
        "rules.txt",
        "$Lv\\.\\s*\\d+\tLevel up\nLv. 99\tMax level\n",
    )?;

    let (snapshot, _) = repository::load_from_dir(&root.join("en").join("Text"), None);

    // Exact term wins over the rule; the rule covers everything else
    assert_eq!(snapshot.lookup("Lv. 99").0, "Max level");
    assert_eq!(snapshot.lookup("Lv. 5").0, "Level up");
    assert_eq!(snapshot.lookup("HP 5"), ("HP 5".to_string(), false));
    Ok(())
}

/// Test that an unreadable entry does not abort the rest of the pass
#[test]
fn test_load_from_dir_with_invalid_pattern_should_continue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_dictionary_file(
        root,
        "en",
        "rules.txt",
        "$[unclosed\tBroken\nHello\tBonjour\n",
    )?;

    let (snapshot, summary) = repository::load_from_dir(&root.join("en").join("Text"), None);

    assert_eq!(summary.invalid_patterns, 1);
    assert_eq!(snapshot.lookup("Hello").0, "Bonjour");
    Ok(())
}
