use anyhow::Context;
use still_life::{SceneDescription, flow};

fn main() -> anyhow::Result<()> {
    let description = match std::env::args_os().nth(1) {
        Some(path) => SceneDescription::from_path(&path)
            .with_context(|| format!("Cannot load scene {:?}", path))?,
        None => SceneDescription::still_life()?,
    };
    flow::run(description)
}
