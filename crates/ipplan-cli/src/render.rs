//! Output rendering for human, JSON and CSV formats
//!
//! Data goes to stdout. Human-format summaries and warnings go to stderr
//! so plan output stays one line per subnet.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io;

use crate::batch::BatchResult;
use crate::OutputFormat;
use ipplan_cidr::{NetworkBlock, OverlapReport};
use ipplan_classify::{classify, ClassificationResult};
use ipplan_core::PrefixLength;
use ipplan_planner::{AllocatedSubnet, UniformPlan, VlsmPlan};

/// Flat subnet record for tables and CSV
#[derive(Serialize)]
struct SubnetRow {
    name: String,
    network: String,
    mask: String,
    first_host: String,
    last_host: String,
    broadcast: String,
    total_addresses: u64,
    usable_hosts: u64,
}

impl From<&AllocatedSubnet> for SubnetRow {
    fn from(subnet: &AllocatedSubnet) -> Self {
        Self {
            name: subnet.origin.label(),
            network: subnet.network.to_string(),
            mask: subnet.network.mask().to_string(),
            first_host: subnet.first_host.to_string(),
            last_host: subnet.last_host.to_string(),
            broadcast: subnet.broadcast.to_string(),
            total_addresses: subnet.total_addresses,
            usable_hosts: subnet.usable_hosts,
        }
    }
}

#[derive(Serialize)]
struct ClassificationRow {
    input: String,
    class: String,
    category: String,
    default_prefix: Option<u8>,
    error: Option<String>,
}

impl From<&ClassificationResult> for ClassificationRow {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            input: result.address.to_string(),
            class: result.class.to_string(),
            category: result.category.to_string(),
            default_prefix: result.default_prefix.map(PrefixLength::get),
            error: None,
        }
    }
}

#[derive(Serialize)]
struct OverlapRow {
    first: String,
    second: String,
    start: String,
    end: String,
    addresses: u64,
}

#[derive(Serialize)]
struct BlockInfo {
    network: NetworkBlock,
    mask: String,
    wildcard: String,
    broadcast: String,
    first_host: String,
    last_host: String,
    total_addresses: u64,
    usable_hosts: u64,
    classification: ClassificationResult,
}

#[derive(Serialize)]
struct MaskInfo {
    prefix: u8,
    mask: String,
    wildcard: String,
    total_addresses: u64,
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}

fn print_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_subnet_line(row: &SubnetRow) {
    println!(
        "{:<16} {:<20} {:>15} - {:<15} bcast {:<15} usable {}",
        row.name.bold(),
        row.network.green(),
        row.first_host,
        row.last_host,
        row.broadcast,
        row.usable_hosts
    );
}

pub fn print_uniform(plan: &UniformPlan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for subnet in &plan.subnets {
                print_subnet_line(&SubnetRow::from(subnet));
            }
            eprintln!(
                "{} {} -> {} x /{} ({} usable hosts each, {} bits borrowed, {} wasted)",
                "›".blue(),
                plan.base,
                plan.subnet_count(),
                plan.new_prefix,
                plan.usable_hosts_per_subnet(),
                plan.bits_borrowed,
                plan.wasted_addresses
            );
        }
        OutputFormat::Json => print_json(plan, true)?,
        OutputFormat::JsonCompact => print_json(plan, false)?,
        OutputFormat::Csv => print_csv(plan.subnets.iter().map(SubnetRow::from))?,
    }
    Ok(())
}

pub fn print_vlsm(plan: &VlsmPlan, format: OutputFormat, input_order: bool) -> Result<()> {
    let subnets: Vec<&AllocatedSubnet> = if input_order {
        plan.in_input_order()
    } else {
        plan.allocations.iter().collect()
    };

    match format {
        OutputFormat::Human => {
            for subnet in &subnets {
                print_subnet_line(&SubnetRow::from(*subnet));
            }
            for skip in &plan.skipped {
                eprintln!("{} {}: {}", "!".yellow(), skip.requirement.name, skip.error());
            }
            eprintln!(
                "{} {} allocated of {} ({:.1}%), {} remaining",
                "›".blue(),
                plan.total_allocated,
                plan.base.size(),
                plan.utilization_percent(),
                plan.remaining_addresses
            );
        }
        OutputFormat::Json => print_json(plan, true)?,
        OutputFormat::JsonCompact => print_json(plan, false)?,
        OutputFormat::Csv => print_csv(subnets.into_iter().map(SubnetRow::from))?,
    }
    Ok(())
}

pub fn print_classifications(results: &[ClassificationResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for result in results {
                print_classification_human(result);
            }
        }
        OutputFormat::Json => print_json(results, true)?,
        OutputFormat::JsonCompact => print_json(results, false)?,
        OutputFormat::Csv => print_csv(results.iter().map(ClassificationRow::from))?,
    }
    Ok(())
}

fn print_classification_human(result: &ClassificationResult) {
    println!();
    println!("{}", "Address Classification".bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
    println!("{:>15}: {}", "Address".bold(), result.address);
    println!("{:>15}: {}", "Class".bold(), result.class.to_string().green());
    println!("{:>15}: {}", "Category".bold(), result.category);
    if let Some(prefix) = result.default_prefix {
        println!("{:>15}: /{}", "Default prefix".bold(), prefix);
    }
    println!();
}

pub fn print_batch(results: &[BatchResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for entry in results {
                match &entry.result {
                    Ok(result) => println!(
                        "{:<18} class {} {}",
                        entry.input,
                        result.class,
                        result.category.to_string().green()
                    ),
                    Err(e) => println!("{:<18} {}", entry.input, e.red()),
                }
            }
        }
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let values: Vec<serde_json::Value> = results
                .iter()
                .map(|entry| match &entry.result {
                    Ok(result) => serde_json::to_value(result),
                    Err(e) => Ok(serde_json::json!({ "input": entry.input, "error": e })),
                })
                .collect::<std::result::Result<_, _>>()?;
            print_json(&values, matches!(format, OutputFormat::Json))?;
        }
        OutputFormat::Csv => print_csv(results.iter().map(|entry| match &entry.result {
            Ok(result) => ClassificationRow::from(result),
            Err(e) => ClassificationRow {
                input: entry.input.clone(),
                class: String::new(),
                category: String::new(),
                default_prefix: None,
                error: Some(e.clone()),
            },
        }))?,
    }
    Ok(())
}

pub fn print_overlaps(report: &OverlapReport, format: OutputFormat) -> Result<()> {
    let rows = || {
        report.iter().map(|overlap| OverlapRow {
            first: overlap.first.to_string(),
            second: overlap.second.to_string(),
            start: overlap.start.to_string(),
            end: overlap.end.to_string(),
            addresses: overlap.size(),
        })
    };

    match format {
        OutputFormat::Human => {
            if report.is_empty() {
                println!("{}", "No overlapping blocks".green());
            }
            for row in rows() {
                println!(
                    "{} {} overlaps {} at {} - {} ({} addresses)",
                    "✗".red(),
                    row.first.bold(),
                    row.second.bold(),
                    row.start,
                    row.end,
                    row.addresses
                );
            }
        }
        OutputFormat::Json => print_json(report, true)?,
        OutputFormat::JsonCompact => print_json(report, false)?,
        OutputFormat::Csv => print_csv(rows())?,
    }
    Ok(())
}

pub fn print_block_info(block: &NetworkBlock, format: OutputFormat) -> Result<()> {
    let info = BlockInfo {
        network: *block,
        mask: block.mask().to_string(),
        wildcard: block.wildcard().to_string(),
        broadcast: block.broadcast().to_string(),
        first_host: block.first_host().to_string(),
        last_host: block.last_host().to_string(),
        total_addresses: block.size(),
        usable_hosts: block.usable_hosts(),
        classification: classify(block.network()),
    };

    match format {
        OutputFormat::Human => {
            println!();
            println!("{}", "Network Block".bold().cyan());
            println!("{}", "─".repeat(50).dimmed());
            println!("{:>15}: {}", "Network".bold(), info.network.to_string().green());
            println!("{:>15}: {}", "Mask".bold(), info.mask);
            println!("{:>15}: {}", "Wildcard".bold(), info.wildcard);
            println!("{:>15}: {}", "Broadcast".bold(), info.broadcast);
            println!("{:>15}: {} - {}", "Hosts".bold(), info.first_host, info.last_host);
            println!("{:>15}: {}", "Total".bold(), info.total_addresses);
            println!("{:>15}: {}", "Usable".bold(), info.usable_hosts);
            println!(
                "{:>15}: {} ({})",
                "Class".bold(),
                info.classification.class,
                info.classification.category
            );
            println!();
        }
        OutputFormat::Json => print_json(&info, true)?,
        OutputFormat::JsonCompact => print_json(&info, false)?,
        OutputFormat::Csv => print_csv([SubnetRow {
            name: String::new(),
            network: info.network.to_string(),
            mask: info.mask,
            first_host: info.first_host,
            last_host: info.last_host,
            broadcast: info.broadcast,
            total_addresses: info.total_addresses,
            usable_hosts: info.usable_hosts,
        }])?,
    }
    Ok(())
}

pub fn print_mask(prefix: PrefixLength, format: OutputFormat) -> Result<()> {
    let info = MaskInfo {
        prefix: prefix.get(),
        mask: prefix.mask().to_string(),
        wildcard: prefix.wildcard().to_string(),
        total_addresses: prefix.block_size(),
    };

    match format {
        OutputFormat::Human => {
            println!("{:>15}: /{}", "Prefix".bold(), info.prefix);
            println!("{:>15}: {}", "Mask".bold(), info.mask.green());
            println!("{:>15}: {}", "Wildcard".bold(), info.wildcard);
            println!("{:>15}: {}", "Addresses".bold(), info.total_addresses);
        }
        OutputFormat::Json => print_json(&info, true)?,
        OutputFormat::JsonCompact => print_json(&info, false)?,
        OutputFormat::Csv => print_csv([info])?,
    }
    Ok(())
}
