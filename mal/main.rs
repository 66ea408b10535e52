use std::io::{
   self,
   Read as _,
   Write as _,
};

use clap::Parser as _;
use mal::{
   error::{
      self,
      ResultExt as _,
   },
   runtime::{
      self,
      Value,
      value::SString,
   },
   syntax,
};
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;
use yansi::Paint as _;

const FAIL_STDOUT: &str = "failed to write to stdout";

#[derive(clap::Parser)]
#[command(version, about, args_conflicts_with_subcommands = true)]
struct Cli {
   #[command(subcommand)]
   command: Option<Command>,

   /// The script to run. Starts the REPL when omitted.
   file: Option<String>,

   /// The arguments bound to *ARGV*.
   #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
   arguments: Vec<String>,

   /// The maximum number of nested evaluations.
   #[arg(long, default_value_t = runtime::DEFAULT_MAX_DEPTH)]
   max_depth: usize,

   /// The log filter. Overrides the MAL_LOG environment variable.
   #[arg(long)]
   log: Option<String>,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum Command {
   /// Various commands related to debugging.
   Dump {
      #[command(subcommand)]
      command: Dump,

      /// The source to dump. If set to '-', stdin is read.
      #[clap(default_value = "-", global = true)]
      source: String,
   },
}

#[derive(clap::Subcommand, Debug, Clone, Copy)]
enum Dump {
   /// Dump the provided source's tokens.
   Token,

   /// Dump the forms read from the provided source.
   Syntax,
}

fn main() -> error::Termination {
   error::Termination::from(run(Cli::parse()))
}

fn run(cli: Cli) -> error::Result<()> {
   let filter = match cli.log {
      Some(ref filter) => EnvFilter::try_new(filter),
      None => EnvFilter::try_from_env("MAL_LOG").or_else(|_| EnvFilter::try_new("warn")),
   }
   .chain_err("invalid log filter")?;

   tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(io::stderr)
      .init();

   if let Some(Command::Dump { command, ref source }) = cli.command {
      return dump(command, source);
   }

   let config = runtime::Config::builder()
      .max_depth(cli.max_depth)
      .argv(cli.arguments)
      .build();
   let env = runtime::environment(config);

   match cli.file {
      Some(ref file) => script(file, &env).chain_err(format!("failed to run '{file}'")),
      None => repl(&env),
   }
}

fn dump(command: Dump, source: &str) -> error::Result<()> {
   let source = if source == "-" {
      let mut buffer = String::new();
      io::stdin()
         .read_to_string(&mut buffer)
         .chain_err("failed to read stdin")?;
      buffer
   } else {
      source.to_owned()
   };

   let out = &mut io::stdout().lock();

   match command {
      Dump::Token => {
         for (kind, slice) in syntax::tokenize(&source) {
            writeln!(out, "{kind:?} {slice:?}").chain_err(FAIL_STDOUT)?;
         }
      },

      Dump::Syntax => {
         let forms = runtime::read_all(&source).chain_err("failed to read source")?;

         for form in forms {
            writeln!(out, "{form}").chain_err(FAIL_STDOUT)?;
         }
      },
   }

   out.flush().chain_err(FAIL_STDOUT)
}

fn script(file: &str, env: &runtime::Env) -> error::Result<()> {
   tracing::debug!(file, "running script");

   let form = Value::list([
      Value::symbol("load-file"),
      Value::String(SString::from(file)),
   ]);

   match runtime::eval(form, env) {
      Value::Exception(ref message) => error::bail!("uncaught exception: {message}"),
      _ => Ok(()),
   }
}

fn repl(env: &runtime::Env) -> error::Result<()> {
   let mut editor = rustyline::DefaultEditor::new().chain_err("failed to create line editor")?;
   let prompt = "user> ".green().bold().to_string();

   tracing::debug!("starting repl");

   loop {
      let line = match editor.readline(&prompt) {
         Ok(line) => line,
         Err(ReadlineError::Interrupted) => continue,
         Err(ReadlineError::Eof) => break,
         Err(error) => return Err(error).chain_err("failed to read line"),
      };

      if line.trim().is_empty() {
         continue;
      }

      editor
         .add_history_entry(line.as_str())
         .chain_err("failed to record history")?;

      let out = &mut io::stdout().lock();

      match runtime::rep(&line, env) {
         Ok(value @ Value::Exception(_)) => {
            writeln!(out, "{value}", value = value.red()).chain_err(FAIL_STDOUT)?;
         },

         Ok(value) => writeln!(out, "{value}").chain_err(FAIL_STDOUT)?,

         Err(error) => {
            writeln!(
               out,
               "{header} {error}",
               header = "read error:".red().bold(),
            )
            .chain_err(FAIL_STDOUT)?;
         },
      }

      out.flush().chain_err(FAIL_STDOUT)?;
   }

   Ok(())
}
