//! Example: Collect the package origins visible from a POM
//!
//! Walks the manifest's inheritance chain (network access required when the
//! parent is not local) and prints the deduplicated, precedence-ordered
//! origin list.
//!
//! Run with: cargo run --package otto-update --example collect_origins

use otto_update::{DependencyFile, MavenContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let pom = r#"<project>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
  <version>0.1.0</version>
  <properties>
    <nexus.host>nexus.example.com</nexus.host>
  </properties>
  <repositories>
    <repository>
      <id>internal</id>
      <url>https://${nexus.host}/repository/releases/</url>
    </repository>
  </repositories>
</project>
"#;
    let files = vec![DependencyFile::new("pom.xml", pom)];

    let client = otto_fetch::HttpClient::new()?;
    let mut ctx = MavenContext::new(&files, &[], &client);

    for origin in ctx.collect_origins(&files[0], false).await {
        match origin.id {
            Some(id) => println!("{id:>10}  {}", origin.url),
            None => println!("{:>10}  {}", "-", origin.url),
        }
    }

    Ok(())
}
