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

fn indexed_course(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    write(
        root,
        "content/modulos/01-introduccion.md",
        "---\ntitle: Introduccion a Python\norder: 1\nkeywords: [python, instalacion]\n---\n## Instalacion\n",
    )?;
    write(
        root,
        "content/modulos/02-funciones.md",
        "---\ntitle: Funciones\norder: 2\nkeywords: [def]\n---\n## Parametros\n\n## Retorno\n",
    )?;
    write(
        root,
        "content/modulos/03-pruebas.md",
        "---\ntitle: Pruebas\norder: 3\nkeywords: [pytest]\n---\n## Pruebas unitarias\n",
    )?;
    write(root, "content/proyecto-final/pytrack.md", "# PyTrack\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(root)
        .arg("index")
        .assert()
        .success();
    Ok(())
}

#[test]
fn search_json_outputs_ranked_results() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    indexed_course(dir.path())?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["search", "pytest", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["kind"], "search.results");

    let results = value["data"]["results"].as_array().expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "modulo-pruebas");
    assert_eq!(results[0]["stored"]["href"], "/modulos/pruebas");

    Ok(())
}

#[test]
fn search_respects_limit() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    indexed_course(dir.path())?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["search", "python funciones pruebas", "--json", "--limit", "1"])
        .assert()
        .success();

    let value: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["data"]["results"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["data"]["total"], 3);

    Ok(())
}

#[test]
fn search_text_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    indexed_course(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["search", "func"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[modulo] Funciones"))
        .stdout(predicate::str::contains("/modulos/funciones"));

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["search", "zzzzzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found"));

    Ok(())
}

#[test]
fn search_without_artifact_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["search", "python"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ejecuta curso index"));

    Ok(())
}

#[test]
fn list_and_show_documents() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    indexed_course(dir.path())?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["list", "--json"])
        .assert()
        .success();
    let value: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    let slugs: Vec<&str> = value["data"]["modules"]
        .as_array()
        .expect("modules array")
        .iter()
        .filter_map(|m| m["slug"].as_str())
        .collect();
    assert_eq!(slugs, vec!["introduccion", "funciones", "pruebas"]);
    assert_eq!(value["data"]["project"]["href"], "/proyecto-final");

    #[allow(deprecated)]
    let assert = Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["show", "introduccion"])
        .assert()
        .success();
    let value: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["data"]["title"], "Introduccion a Python");
    assert!(value["data"]["adjacent"]["previous"].is_null());
    assert_eq!(value["data"]["adjacent"]["next"]["slug"], "funciones");

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["show", "funciones", "--format", "toc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Parametros (#parametros)"));

    #[allow(deprecated)]
    Command::cargo_bin("curso")?
        .current_dir(dir.path())
        .args(["show", "no-existe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    Ok(())
}
