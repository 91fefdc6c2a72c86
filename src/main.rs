use std::env;
use std::fs::File;

use joblens::export;
use joblens::filter::FilterSpec;
use joblens::query::Dashboard;

/// Default dataset location; override with the first CLI argument.
const DEFAULT_SOURCE_URL: &str = "https://www.dropbox.com/scl/fi/2ajbqq5yqt637kjjez1pk/combined_data_screen7.parquet?rlkey=mun8x2i6teb6h4a9r69jgsk9k&st=wvis2997&dl=1";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let source = args.next().unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());
    let requested_msa = args.next();

    println!("Job Market Explorer");
    println!("===================");
    println!("Source: {}", source);
    println!();

    let dashboard = Dashboard::new(source);

    let msas = dashboard.available_msas().expect("failed to list MSAs");
    println!("{} MSAs available", msas.len());
    let msa = requested_msa
        .or_else(|| msas.first().cloned())
        .expect("dataset contains no MSAs");

    let options = dashboard
        .filter_options(&msa)
        .expect("failed to derive filter controls");
    println!("Selected MSA: {}", msa);
    println!("Employment types: {}", options.employment_types.join(", "));
    println!("Remote types: {}", options.remote_types.join(", "));
    println!("Salary domain: 0 - {}", options.salary_ceiling);
    println!();

    let spec = FilterSpec::default();
    let view = dashboard.run(&msa, &spec).expect("dashboard run failed");

    println!("Job Insights for {}", msa);
    println!("{:-<72}", "");
    println!("{} postings match the current filters", view.filtered.len());
    println!();

    print_counts("Top Industries (NAICS2)", &view.top_industries);
    print_counts("Top Occupations (SOC 5)", &view.top_occupations);
    print_counts("Top Specialized Skills", &view.top_specialized_skills);
    print_counts("Top Hiring Companies", &view.top_companies);
    print_counts("Minimum Education Required", &view.education_mix);

    println!("Salary Distribution");
    println!("{:-<72}", "");
    for bin in &view.salary_histogram {
        println!("{:>12.0} - {:>12.0} {:>8}", bin.lower, bin.upper, bin.count);
    }
    println!();

    println!("Top Specialized Skills by Industry (NAICS2)");
    println!("{:-<72}", "");
    for leaf in view.specialized_by_industry.iter().take(15) {
        println!("{:<28} {:<28} {:>8}", leaf.industry, leaf.skill, leaf.count);
    }
    println!();

    let file_name = export::export_file_name(&msa);
    let file = File::create(&file_name).expect("failed to create export file");
    export::write_csv(file, &view.filtered).expect("csv export failed");
    println!("Wrote {} filtered postings to {}", view.filtered.len(), file_name);
}

fn print_counts(title: &str, table: &[joblens::aggregator::CategoryCount]) {
    println!("{}", title);
    println!("{:-<72}", "");
    for row in table {
        println!("{:<58} {:>8}", row.category, row.count);
    }
    println!();
}
