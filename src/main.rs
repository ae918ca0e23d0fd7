use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use pdfpretty as pdf;
use pdf::inspect::{self, StreamView};
use pdf::reader::SimpleReader;

/// Prints the structure of a PDF file section by section, in file order, with annotations.
#[derive(Parser, Debug)]
#[command(name = "pdfpretty", version, about, long_about = None)]
struct Args {
    /// Path to the PDF file
    file: PathBuf,

    /// Increase diagnostic output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all diagnostic output
    #[arg(short, long)]
    quiet: bool,

    /// Print stream payloads as stored, without decoding or interpretation
    #[arg(long)]
    raw: bool,

    /// Maximum number of characters printed for a single stream payload
    #[arg(long, default_value_t = 2000)]
    max_chars: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = stderrlog::new()
        .module("pdfpretty")
        .quiet(args.quiet)
        .verbosity(1 + args.verbose as usize)
        .init()
    {
        eprintln!("pdfpretty: could not set up logging: {err}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pdfpretty: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), pdf::Error> {
    let data = std::fs::read(&args.file)?;
    let reader = SimpleReader::new(&data)?;
    let stdout = io::stdout();
    let mut out = Printer { out: BufWriter::new(stdout.lock()), args, reader: &reader };
    let mut result = Ok(());
    for item in reader.sweep() {
        match item {
            Ok(tlo) => out.print_tlo(&tlo)?,
            Err(err) => {
                result = Err(err);
                break;
            }
        }
    }
    out.out.flush()?;
    result
}

struct Printer<'r, 'a, W: Write> {
    out: W,
    args: &'r Args,
    reader: &'r SimpleReader<'a>,
}

impl<W: Write> Printer<'_, '_, W> {
    fn note(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "# {text}")
    }

    fn print_tlo(&mut self, tlo: &pdf::TLO) -> io::Result<()> {
        match tlo {
            pdf::TLO::Object { obj, kind } => {
                let pdf::ObjRef { num, gen } = obj.oref;
                writeln!(self.out)?;
                match kind {
                    Some(kind) => self.note(&format!("Object {num} {gen} at offset {}: {kind}", obj.offset))?,
                    None => self.note(&format!("Object {num} {gen} at offset {}", obj.offset))?
                }
                if let Some(descr) = kind.as_deref().and_then(inspect::type_description) {
                    self.note(descr)?;
                }
                writeln!(self.out, "{num} {gen} obj")?;
                obj.value.print_indented(&mut self.out, 0)?;
                if obj.stream.is_some() {
                    self.print_stream(obj, kind.as_deref())?;
                }
            },
            pdf::TLO::EndObj { .. } => writeln!(self.out, "endobj")?,
            pdf::TLO::Comment { text, kind, .. } => {
                if let Some(expl) = inspect::comment_explanation(kind) {
                    self.note(&expl)?;
                }
                self.out.write_all(text)?;
                writeln!(self.out)?;
            },
            pdf::TLO::XRef { sections, .. } => {
                writeln!(self.out)?;
                writeln!(self.out, "xref")?;
                for sec in sections {
                    writeln!(self.out, "{} {}", sec.start, sec.count())?;
                    for (_, rec) in sec.iter() {
                        match *rec {
                            pdf::Record::Used { gen, offset } => writeln!(self.out, "{offset:010} {gen:05} n")?,
                            pdf::Record::Free { gen, next } => writeln!(self.out, "{next:010} {gen:05} f")?,
                            pdf::Record::Compr { num_within, index } => writeln!(self.out, "{num_within} {index} c")?,
                        }
                    }
                }
            },
            pdf::TLO::Trailer { dict, .. } => {
                writeln!(self.out, "trailer")?;
                dict.print_indented(&mut self.out, 0)?;
            },
            pdf::TLO::StartXRef { value, .. } => {
                self.note(inspect::STARTXREF_NOTE)?;
                writeln!(self.out, "startxref")?;
                writeln!(self.out, "{value}")?;
            },
        }
        Ok(())
    }

    fn print_stream(&mut self, obj: &pdf::ParsedObject, kind: Option<&str>) -> io::Result<()> {
        writeln!(self.out, "stream")?;
        if self.args.raw {
            if let Some(stream) = &obj.stream {
                self.print_bytes(&stream.raw)?;
            }
            return writeln!(self.out, "endstream");
        }
        match inspect::view_stream(obj, kind, self.reader) {
            Some(StreamView::XRef(sections)) => {
                self.note(inspect::XREF_STREAM_NOTE)?;
                for (num, rec) in sections.iter().flat_map(pdf::Subsection::iter) {
                    writeln!(self.out, "{}{}", SPACES, inspect::record_line(num, rec))?;
                }
            },
            Some(StreamView::ObjStm(objects)) => {
                self.note(inspect::OBJSTM_NOTE)?;
                for (num, offset, obj) in objects {
                    self.note(&format!("Object {num} at offset {offset}"))?;
                    obj.print_indented(&mut self.out, 0)?;
                }
            },
            Some(StreamView::Commands(commands)) => {
                for cmd in commands {
                    writeln!(self.out, "{SPACES}{cmd}")?;
                }
            },
            Some(StreamView::Image) => writeln!(self.out, "[ image data ]")?,
            Some(StreamView::Binary(len)) => writeln!(self.out, "[ {len} bytes of binary data ]")?,
            Some(StreamView::LargeText(len)) => writeln!(self.out, "[ {len} bytes of text data ]")?,
            Some(StreamView::Text(data)) => self.print_bytes(data)?,
            Some(StreamView::Raw(data)) => {
                self.note("Couldn't interpret this stream data, showing it as is")?;
                self.print_bytes(data)?;
            },
            None => ()
        }
        writeln!(self.out, "endstream")
    }

    /// Printable ASCII and newlines as they are, other bytes as highlighted hex codes.
    fn print_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        let mut need_nl = false;
        for (count, &c) in data.iter().enumerate() {
            if count >= self.args.max_chars {
                writeln!(self.out, "...")?;
                return Ok(());
            }
            match c {
                0x20..=0x7E | b'\n' => write!(self.out, "{}", c as char)?,
                _ => write!(self.out, "\x1B[7m<{:02x}>\x1B[0m", c)?
            }
            need_nl = c != b'\n';
        }
        if need_nl {
            writeln!(self.out)?;
        }
        Ok(())
    }
}

const SPACES: &str = "  ";

trait PrettyPrint {
    fn print_indented(&self, out: &mut impl Write, indent: usize) -> io::Result<()>;
}

impl PrettyPrint for pdf::Object {
    fn print_indented(&self, out: &mut impl Write, indent: usize) -> io::Result<()> {
        match self {
            pdf::Object::Array(arr) if arr.iter().any(|item| matches!(item, pdf::Object::Array(_) | pdf::Object::Dict(_))) =>
                arr.print_indented(out, indent),
            pdf::Object::Dict(dict) if !dict.is_empty() => dict.print_indented(out, indent),
            obj => writeln!(out, "{obj}")
        }
    }
}

impl PrettyPrint for Vec<pdf::Object> {
    fn print_indented(&self, out: &mut impl Write, indent: usize) -> io::Result<()> {
        let ind = SPACES.repeat(indent);
        writeln!(out, "[")?;
        for item in self {
            write!(out, "{ind}{SPACES}")?;
            item.print_indented(out, indent + 1)?;
        }
        writeln!(out, "{ind}]")
    }
}

impl PrettyPrint for pdf::Dict {
    fn print_indented(&self, out: &mut impl Write, indent: usize) -> io::Result<()> {
        let ind = SPACES.repeat(indent);
        writeln!(out, "<<")?;
        for (key, val) in self {
            write!(out, "{ind}{SPACES}{key} ")?;
            val.print_indented(out, indent + 1)?;
        }
        writeln!(out, "{ind}>>")
    }
}
