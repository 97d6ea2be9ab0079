use log::debug;
use recipe_draft_import::{
    import_from_image, import_from_url, media_type_for_path, ImportConfig, StaticVocabulary,
};
use std::env;
use std::path::PathBuf;

const USAGE: &str = "Usage: recipe-draft-import <url>\n       \
    recipe-draft-import --image <path> [--media-type <type>]\n\n\
    Options:\n  --vocabulary <file.json>  resolve ingredient lines against this vocabulary";

#[derive(Debug, PartialEq)]
enum Source {
    Url(String),
    Image {
        path: PathBuf,
        media_type: Option<String>,
    },
}

#[derive(Debug, PartialEq)]
struct Args {
    source: Source,
    vocabulary: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut url = None;
    let mut image = None;
    let mut media_type = None;
    let mut vocabulary = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} requires a value", flag))
        };
        match arg.as_str() {
            "--image" => image = Some(PathBuf::from(value(arg.as_str())?)),
            "--media-type" => media_type = Some(value(arg.as_str())?),
            "--vocabulary" => vocabulary = Some(PathBuf::from(value(arg.as_str())?)),
            flag if flag.starts_with("--") => return Err(format!("Unknown option {}", flag)),
            _ if url.is_some() => return Err("Only one URL can be imported at a time".into()),
            _ => url = Some(arg.clone()),
        }
    }

    let source = match (url, image) {
        (Some(url), None) => Source::Url(url),
        (None, Some(path)) => Source::Image { path, media_type },
        (Some(_), Some(_)) => return Err("Give either a URL or --image, not both".into()),
        (None, None) => return Err("Please provide a URL or --image <path>".into()),
    };

    Ok(Args { source, vocabulary })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let raw_args: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&raw_args).map_err(|e| format!("{}\n\n{}", e, USAGE))?;

    let config = ImportConfig::load()?;
    debug!("Loaded configuration: provider={}", config.llm.provider);

    let vocabulary = match &args.vocabulary {
        Some(path) => StaticVocabulary::from_file(path).await?,
        None => StaticVocabulary::default(),
    };

    let draft = match args.source {
        Source::Url(url) => import_from_url(&url, &config, &vocabulary).await?,
        Source::Image { path, media_type } => {
            let media_type = media_type
                .or_else(|| media_type_for_path(&path).map(str::to_string))
                .ok_or_else(|| {
                    format!("Cannot infer image type of {}; use --media-type", path.display())
                })?;
            let bytes = tokio::fs::read(&path).await?;
            import_from_image(&bytes, &media_type, &config, &vocabulary).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(())
}
