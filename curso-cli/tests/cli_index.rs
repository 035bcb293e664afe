use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, contents: &str) -> std::io::Result<()> {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent dir"))?;
    fs::write(path, contents)
}

fn course(root: &Path) -> std::io::Result<()> {
    write(
        root,
        "content/modulos/01-introduccion.md",
        "---\ntitle: Introduccion\ndescription: Primeros pasos\norder: 1\nkeywords: [python]\n---\n# Introduccion\n\n## Instalacion\n",
    )?;
    write(
        root,
        "content/modulos/02-pruebas.md",
        "---\ntitle: Pruebas\norder: 2\nkeywords: [pytest]\n---\n## Pruebas unitarias\n",
    )?;
    write(
        root,
        "content/proyecto-final/pytrack.md",
        "# PyTrack\n\nGestor de tareas.\n",
    )?;
    write(root, "content/anexos/glosario.md", "# Glosario\n")
}

#[test]
fn index_writes_artifact() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    course(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 4 documents"));

    let json = fs::read_to_string(dir.path().join("public/search-index.json"))?;
    let value: Value = serde_json::from_str(&json)?;
    let ids: Vec<&str> = value["documents"]
        .as_array()
        .expect("documents array")
        .iter()
        .filter_map(|doc| doc["id"].as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "modulo-introduccion",
            "modulo-pruebas",
            "proyecto-pytrack",
            "anexo-glosario"
        ]
    );
    assert_eq!(value["config"]["searchOptions"]["fuzzy"], 0.2);
    assert!(value["index"].is_object());

    Ok(())
}

#[test]
fn index_respects_config_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    course(dir.path())?;
    fs::write(
        dir.path().join("site.yml"),
        "paths:\n  output: dist\nsearch:\n  artifact: buscar.json\nbase_url: /curso\n",
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["--config", "site.yml", "index"])
        .assert()
        .success();

    let json = fs::read_to_string(dir.path().join("dist/buscar.json"))?;
    assert!(json.contains("\"/curso/modulos/pruebas\""));

    Ok(())
}

#[test]
fn index_fails_without_project() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    course(dir.path())?;
    fs::remove_file(dir.path().join("content/proyecto-final/pytrack.md"))?;

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to build search index"));

    assert!(!dir.path().join("public/search-index.json").exists());
    Ok(())
}

#[test]
fn index_fails_without_modules_dir() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write(dir.path(), "content/proyecto-final/pytrack.md", "# PyTrack\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .failure()
        .stderr(predicate::str::contains("modulo"));

    Ok(())
}

#[test]
fn index_is_byte_identical_across_runs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    course(dir.path())?;
    let artifact = dir.path().join("public/search-index.json");

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .success();
    let first = fs::read(&artifact)?;

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .success();
    assert_eq!(first, fs::read(&artifact)?);

    Ok(())
}
