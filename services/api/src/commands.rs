use crate::infra::{offline_candidate_service, parse_tier};
use chrono::Local;
use clap::Args;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use talent_tier::config::AppConfig;
use talent_tier::error::AppError;
use talent_tier::workflows::candidates::{
    classify, CandidateFilter, ExportFormat, SkillSet, Tier,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ClassifyArgs {
    /// Knows HTML, CSS, and JavaScript
    #[arg(long)]
    pub(crate) html_css_js: bool,
    /// Knows React or Next.js
    #[arg(long)]
    pub(crate) react_next: bool,
    /// Can build a CRUD application with a database
    #[arg(long)]
    pub(crate) crud: bool,
    /// Can add authentication to an application
    #[arg(long)]
    pub(crate) auth: bool,
    /// Knows a backend framework such as Express, Hono, or Laravel
    #[arg(long)]
    pub(crate) backend: bool,
    /// Can build APIs in Go
    #[arg(long)]
    pub(crate) golang: bool,
    /// Has cloud infrastructure or container experience
    #[arg(long)]
    pub(crate) cloud_infra: bool,
    /// Has system design experience
    #[arg(long)]
    pub(crate) system_design: bool,
}

impl ClassifyArgs {
    fn skills(&self) -> SkillSet {
        SkillSet {
            knows_html_css_js: self.html_css_js,
            knows_react_next: self.react_next,
            can_build_crud: self.crud,
            can_build_auth: self.auth,
            knows_backend_frameworks: self.backend,
            knows_golang: self.golang,
            knows_cloud_infra: self.cloud_infra,
            knows_system_design: self.system_design,
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FilterArgs {
    /// Only candidates in this tier (0-5)
    #[arg(long, value_parser = parse_tier)]
    pub(crate) tier: Option<Tier>,
    /// Case-insensitive match against name or email
    #[arg(long)]
    pub(crate) search: Option<String>,
}

impl From<FilterArgs> for CandidateFilter {
    fn from(args: FilterArgs) -> Self {
        CandidateFilter {
            tier: args.tier,
            search: args.search,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct CandidateListArgs {
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CandidateExportArgs {
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
    /// Add a BOM, tier titles, and MM/DD/YYYY dates for spreadsheet tools
    #[arg(long)]
    pub(crate) spreadsheet: bool,
    /// Write to this path instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_classify(args: ClassifyArgs) {
    let tier = classify(&args.skills());
    let definition = tier.definition();
    println!("{}", definition.title);
    println!("{}", definition.description);
}

pub(crate) fn run_candidate_list(args: CandidateListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = offline_candidate_service(&config);
    let records = service.list(&args.filter.into());

    if records.is_empty() {
        println!("No candidates match the given filters.");
        return Ok(());
    }

    println!("{} candidate(s), newest first", records.len());
    for record in &records {
        println!(
            "- #{} {} <{}> | {} | registered {}",
            record.id,
            record.name,
            record.email,
            record.tier().definition().title,
            record.created_at.format("%Y-%m-%d %H:%M UTC")
        );
    }

    Ok(())
}

pub(crate) fn run_candidate_export(args: CandidateExportArgs) -> Result<(), AppError> {
    let CandidateExportArgs {
        filter,
        spreadsheet,
        output,
    } = args;

    let format = if spreadsheet {
        ExportFormat::Spreadsheet
    } else {
        ExportFormat::Standard
    };

    let config = AppConfig::load()?;
    let service = offline_candidate_service(&config);
    let export = service.export(&filter.into(), format, Local::now().date_naive())?;

    match output {
        Some(path) => {
            fs::write(&path, &export.body)?;
            println!(
                "Wrote {} ({} bytes, suggested name {})",
                path.display(),
                export.body.len(),
                export.file_name
            );
        }
        None => io::stdout().write_all(&export.body)?,
    }

    Ok(())
}
