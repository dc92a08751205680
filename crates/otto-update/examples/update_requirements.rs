//! Example: Update a dependency across a requirements file set
//!
//! Run with: cargo run --package otto-update --example update_requirements

use otto_update::{Dependency, DependencyFile, FileUpdater, Requirement};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== otto-update: Update a flat requirements set ===\n");

    let files = vec![
        DependencyFile::new(
            "requirements.txt",
            "# web stack\nrequests==2.31.0\nflask==2.3.2\n",
        ),
        DependencyFile::new("requirements-dev.txt", "requests==2.31.0\npytest==7.4.0\n"),
    ];

    let requirement = |file: &str, req: &str| Requirement {
        file: file.to_string(),
        requirement: req.to_string(),
        groups: vec!["default".to_string()],
        source: None,
    };

    let dependency = Dependency {
        name: "requests".to_string(),
        current_version: Some("2.31.0".to_string()),
        desired_version: Some("2.32.0".to_string()),
        requirements: vec![
            requirement("requirements.txt", "==2.32.0"),
            requirement("requirements-dev.txt", "==2.32.0"),
        ],
        previous_requirements: vec![
            requirement("requirements.txt", "==2.31.0"),
            requirement("requirements-dev.txt", "==2.31.0"),
        ],
    };

    let updater = FileUpdater::new()?;
    let updated = updater
        .updated_dependency_files(&files, &dependency, &[])
        .await?;

    for file in updated {
        println!("--- {} ---", file.name);
        print!("{}", file.content);
        println!();
    }

    Ok(())
}
