use std::io::Write;

use anyhow::Result;
use indoc::indoc;
use mince_yaml::{Manifest, load};

#[test]
fn full_manifest() -> Result<()> {
    let yaml = indoc! {"
        # assets for the release build
        minify:
          - js/app.js
          - js/vendor.js
        combine:
          dist/site.css:
            - css/reset.css
            - css/layout.css
          dist/all.js: [js/a.js, js/b.js]
    "};
    let manifest = Manifest::from_value(&load(yaml)?)?;
    assert_eq!(manifest.minify, vec!["js/app.js", "js/vendor.js"]);
    assert_eq!(manifest.combine.len(), 2);
    assert_eq!(manifest.combine[0].0, "dist/site.css");
    assert_eq!(manifest.combine[0].1, vec!["css/reset.css", "css/layout.css"]);
    assert_eq!(manifest.combine[1].1, vec!["js/a.js", "js/b.js"]);
    Ok(())
}

#[test]
fn empty_document_is_an_empty_manifest() -> Result<()> {
    let manifest = Manifest::from_value(&load("# nothing yet\n")?)?;
    assert!(manifest.minify.is_empty());
    assert!(manifest.combine.is_empty());
    Ok(())
}

#[test]
fn unknown_keys_are_ignored() -> Result<()> {
    let manifest = Manifest::from_value(&load("minify: a.js\nwatch: true\n")?)?;
    assert_eq!(manifest.minify, vec!["a.js"]);
    Ok(())
}

#[test]
fn wrong_shapes_are_errors() -> Result<()> {
    assert!(Manifest::from_value(&load("combine: [a.css]\n")?).is_err());
    assert!(Manifest::from_value(&load("minify:\n  nested: map\n")?).is_err());
    Ok(())
}

#[test]
fn manifest_from_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"minify:\n  - only.js\n")?;
    file.flush()?;
    let manifest = Manifest::load_file(file.path())?;
    assert_eq!(manifest.minify, vec!["only.js"]);
    Ok(())
}
