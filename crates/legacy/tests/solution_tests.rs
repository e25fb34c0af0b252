//! Solution project listing through the configured provider.

use dgspec_legacy::{BridgeConfig, Error, ProjectListProviderKind};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SOLUTION: &str = "\u{feff}
Microsoft Visual Studio Solution File, Format Version 12.00\r
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"src\\App\\App.csproj\", \"{A55205E7-4D08-4672-8011-0925467CC45F}\"\r
EndProject\r
Project(\"{2150e333-8fdc-42a3-9474-1a3956d46de8}\") = \"docs\", \"docs\", \"{44B29B8D-8413-42D2-8DF4-72225659619B}\"\r
EndProject\r
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Tests\", \"test\\App.Tests\\App.Tests.csproj\", \"{78A6AD3F-9FA5-47F6-A54E-84B46A48CB2F}\"\r
EndProject\r
";

#[tokio::test]
async fn test_default_provider_reads_solution_file() {
    let temp_dir = TempDir::new().unwrap();
    let solution = temp_dir.path().join("All.sln");
    fs::write(&solution, SOLUTION).unwrap();

    let provider = BridgeConfig::default().project_list_provider();
    let paths = provider.project_paths(&solution).await.unwrap();

    assert_eq!(
        paths,
        vec![
            temp_dir.path().join(PathBuf::from("src/App/App.csproj")),
            temp_dir
                .path()
                .join(PathBuf::from("test/App.Tests/App.Tests.csproj")),
        ]
    );
}

#[tokio::test]
async fn test_solution_without_projects() {
    let temp_dir = TempDir::new().unwrap();
    let solution = temp_dir.path().join("Empty.sln");
    fs::write(&solution, "Global\nEndGlobal\n").unwrap();

    let provider = BridgeConfig::default().project_list_provider();
    assert!(provider.project_paths(&solution).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_toolchain_provider_reports_missing_toolchain() {
    let temp_dir = TempDir::new().unwrap();
    let config = BridgeConfig {
        project_list_provider: ProjectListProviderKind::Toolchain,
        toolchain_path: temp_dir.path().join("no-such-toolchain"),
    };

    let result = config
        .project_list_provider()
        .project_paths(&temp_dir.path().join("All.sln"))
        .await;

    match result {
        Err(Error::ToolchainFailed { command, .. }) => {
            assert!(command.contains("no-such-toolchain"));
            assert!(command.ends_with("list"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_solution_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let solution = temp_dir.path().join("Missing.sln");

    let result = BridgeConfig::default()
        .project_list_provider()
        .project_paths(&solution)
        .await;

    match result {
        Err(Error::Io { source, path, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            assert_eq!(path, Some(solution));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
