use assert_cmd::Command;
use mockito::Server;
use predicates::prelude::*;
use std::path::Path;

const LISTING_TWO_STALE: &str = r#"<crx version="2.0" user="admin" workspace="crx.default">
  <response>
    <status code="200">ok</status>
    <data>
      <packages>
        <package>
          <group>public</group>
          <name>site-content</name>
          <version>1.0</version>
          <downloadname>site-content-1.0.zip</downloadname>
        </package>
        <package>
          <group>public</group>
          <name>site-content</name>
          <version>1.1</version>
          <downloadname>site-content-1.1.zip</downloadname>
        </package>
      </packages>
    </data>
  </response>
</crx>"#;

const LISTING_UNPACKED: &str = r#"<crx>
  <response>
    <status code="200">ok</status>
    <data>
      <packages>
        <package>
          <group>public</group>
          <name>site-content</name>
          <version>2.0</version>
          <downloadname>site-content-2.0.zip</downloadname>
          <lastunpacked>Tue, 4 Feb 2014 11:00:00 +0100</lastunpacked>
        </package>
      </packages>
    </data>
  </response>
</crx>"#;

fn crxpkg(server: &Server) -> Command {
    let host_with_port = server.host_with_port();
    let (host, port) = host_with_port.split_once(':').unwrap();
    let mut cmd = Command::cargo_bin("crxpkg").unwrap();
    cmd.arg("--host").arg(host).arg("--port").arg(port);
    cmd
}

fn write_artifact(dir: &Path) -> std::path::PathBuf {
    let artifact = dir.join("site-content-2.0.zip");
    std::fs::write(&artifact, b"zip payload").unwrap();
    artifact
}

#[test]
fn test_list_prints_deployed_records() {
    let mut server = Server::new();

    let _listing = server
        .mock("GET", "/crx/packmgr/service.jsp?cmd=ls")
        .with_status(200)
        .with_body(LISTING_UNPACKED)
        .create();

    crxpkg(&server)
        .arg("list")
        .arg("site-content")
        .assert()
        .success()
        .stdout(predicate::str::contains("2.0\tsite-content-2.0.zip"))
        .stdout(predicate::str::contains("Tue, 4 Feb 2014"));
}

#[test]
fn test_upload_purges_stale_versions_and_uploads() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let artifact = write_artifact(dir.path());

    let listing = server
        .mock("GET", "/crx/packmgr/service.jsp?cmd=ls")
        .with_status(200)
        .with_body(LISTING_TWO_STALE)
        .create();
    let delete_10 = server
        .mock(
            "POST",
            "/crx/packmgr/service/.json/etc/packages/public/site-content-1.0.zip?cmd=delete",
        )
        .with_status(200)
        .create();
    let delete_11 = server
        .mock(
            "POST",
            "/crx/packmgr/service/.json/etc/packages/public/site-content-1.1.zip?cmd=delete",
        )
        .with_status(200)
        .create();
    let upload = server
        .mock("POST", "/crx/packmgr/service/.json?cmd=upload")
        .match_body(mockito::Matcher::Regex(
            "name=\"package\"[\\s\\S]*zip payload".to_string(),
        ))
        .with_status(200)
        .create();

    crxpkg(&server)
        .arg("upload")
        .arg("site-content")
        .arg(&artifact)
        .arg("--pkg-version")
        .arg("2.0")
        .assert()
        .success();

    listing.assert();
    delete_10.assert();
    delete_11.assert();
    upload.assert();
}

#[test]
fn test_upload_is_idempotent_when_version_present() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let artifact = write_artifact(dir.path());

    let listing = server
        .mock("GET", "/crx/packmgr/service.jsp?cmd=ls")
        .with_status(200)
        .with_body(LISTING_UNPACKED)
        .create();
    let upload = server
        .mock("POST", "/crx/packmgr/service/.json?cmd=upload")
        .expect(0)
        .create();

    crxpkg(&server)
        .arg("upload")
        .arg("site-content")
        .arg(&artifact)
        .arg("--pkg-version")
        .arg("2.0")
        .assert()
        .success();

    listing.assert();
    upload.assert();
}

#[test]
fn test_install_skips_already_unpacked_version() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let artifact = write_artifact(dir.path());

    let listing = server
        .mock("GET", "/crx/packmgr/service.jsp?cmd=ls")
        .with_status(200)
        .with_body(LISTING_UNPACKED)
        .create();
    let install = server
        .mock(
            "POST",
            "/crx/packmgr/service/.json/etc/packages/public/site-content-2.0.zip?cmd=install",
        )
        .expect(0)
        .create();

    crxpkg(&server)
        .arg("install")
        .arg("site-content")
        .arg(&artifact)
        .arg("--pkg-version")
        .arg("2.0")
        .assert()
        .success();

    listing.assert();
    install.assert();
}

#[test]
fn test_install_recursive_sends_flag() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let artifact = write_artifact(dir.path());

    let empty_listing = r#"<crx><response><status code="200">ok</status>
        <data><packages/></data></response></crx>"#;
    let listing = server
        .mock("GET", "/crx/packmgr/service.jsp?cmd=ls")
        .with_status(200)
        .with_body(empty_listing)
        .create();
    let install = server
        .mock(
            "POST",
            "/crx/packmgr/service/.json/etc/packages/public/site-content-2.0.zip?cmd=install&recursive=true",
        )
        .with_status(200)
        .create();

    crxpkg(&server)
        .arg("install")
        .arg("site-content")
        .arg(&artifact)
        .arg("--pkg-version")
        .arg("2.0")
        .arg("--recursive")
        .assert()
        .success();

    listing.assert();
    install.assert();
}

#[test]
fn test_delete_issues_single_command() {
    let mut server = Server::new();

    let delete = server
        .mock(
            "POST",
            "/crx/packmgr/service/.json/etc/packages/public/site-content-1.0.zip?cmd=delete",
        )
        .with_status(200)
        .create();

    crxpkg(&server)
        .arg("delete")
        .arg("site-content-1.0.zip")
        .assert()
        .success();

    delete.assert();
}

#[test]
fn test_activate_uses_replicate_command() {
    let mut server = Server::new();

    let replicate = server
        .mock(
            "POST",
            "/crx/packmgr/service/.json/etc/packages/public/site-content-1.0.zip?cmd=replicate",
        )
        .with_status(200)
        .create();

    crxpkg(&server)
        .arg("activate")
        .arg("site-content-1.0.zip")
        .assert()
        .success();

    replicate.assert();
}

#[test]
fn test_listing_failure_aborts_with_context() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let artifact = write_artifact(dir.path());

    let _listing = server
        .mock("GET", "/crx/packmgr/service.jsp?cmd=ls")
        .with_status(503)
        .create();

    crxpkg(&server)
        .arg("upload")
        .arg("site-content")
        .arg(&artifact)
        .arg("--pkg-version")
        .arg("2.0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("503"));
}
