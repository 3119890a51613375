use crate::core::{AnalysisReport, ModuleReport};
use colored::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        for module in &report.modules {
            self.write_module(module)?;
        }
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Input Cone Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Netlist: `{}`", report.netlist)?;
        writeln!(self.writer, "Generator: {}", report.generator)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let sequential = report.modules.iter().filter(|m| m.is_sequential).count();
        let combinational = report.modules.len() - sequential;

        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Modules | {} |", report.modules.len())?;
        writeln!(self.writer, "| Combinational | {combinational} |")?;
        writeln!(self.writer, "| Sequential (skipped) | {sequential} |")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_module(&mut self, module: &ModuleReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## {}", module.module)?;
        writeln!(self.writer)?;

        if module.is_sequential {
            writeln!(self.writer, "Sequential module; dependency analysis skipped.")?;
            writeln!(self.writer)?;
        }

        writeln!(self.writer, "- Input bits: {}", module.inputs.len())?;
        writeln!(self.writer, "- Output bits: {}", module.outputs.len())?;
        writeln!(self.writer)?;

        if let Some(table) = &module.dependencies {
            writeln!(self.writer, "| Output bit | Depends on |")?;
            writeln!(self.writer, "|------------|------------|")?;
            for (key, deps) in table.iter() {
                let cone = if deps.is_empty() {
                    "(none)".to_string()
                } else {
                    deps.iter()
                        .map(|d| format!("`{d}`"))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                writeln!(self.writer, "| `{key}` | {cone} |")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

pub struct TerminalWriter;

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for TerminalWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        print_header(report);
        print_summary(report);
        for module in &report.modules {
            print_module(module);
        }
        Ok(())
    }
}

fn print_header(report: &AnalysisReport) {
    println!("{}", "Input Cone Report".bold().blue());
    println!("{}", "=================".blue());
    println!("Netlist: {}", report.netlist);
    println!();
}

fn print_summary(report: &AnalysisReport) {
    let sequential = report.modules.iter().filter(|m| m.is_sequential).count();
    let combinational = report.modules.len() - sequential;

    println!("Summary:");
    println!("  Modules: {}", report.modules.len());
    println!("  Combinational: {}", combinational.to_string().green());
    println!("  Sequential (skipped): {}", sequential.to_string().yellow());
    println!();
}

fn print_module(module: &ModuleReport) {
    if module.is_sequential {
        println!(
            "  {} {} {}",
            "-".yellow(),
            module.module.bold(),
            "sequential, analysis skipped".yellow()
        );
        return;
    }

    let widest = module.max_cone_size().unwrap_or(0);
    println!(
        "  {} {} {} input bits, {} output bits, widest cone {}",
        "✓".green(),
        module.module.bold(),
        module.inputs.len(),
        module.outputs.len(),
        widest.to_string().green()
    );

    if let Some(table) = &module.dependencies {
        for (key, deps) in table.iter() {
            let cone: Vec<String> = deps.iter().map(|d| d.to_string()).collect();
            println!("      {} <- {}", key.cyan(), cone.join(", "));
        }
    }
}

pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    match (format, output) {
        (OutputFormat::Json, None) => Ok(Box::new(JsonWriter::new(std::io::stdout()))),
        (OutputFormat::Json, Some(path)) => Ok(Box::new(JsonWriter::new(File::create(path)?))),
        (OutputFormat::Markdown, None) => Ok(Box::new(MarkdownWriter::new(std::io::stdout()))),
        (OutputFormat::Markdown, Some(path)) => {
            Ok(Box::new(MarkdownWriter::new(File::create(path)?)))
        }
        (OutputFormat::Terminal, None) => Ok(Box::new(TerminalWriter::new())),
        (OutputFormat::Terminal, Some(_)) => {
            anyhow::bail!("terminal format writes to stdout; use json or markdown with --output")
        }
    }
}
