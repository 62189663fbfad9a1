//! kli-drv - Pipeline orchestrator.
//!
//! `Interpreter::run(root)` drives the whole front-end: the root file is
//! registered and queued for lexing, then the orchestrator loops in
//! waves. Each wave collects every pending lex and parse task into one
//! dependency-free graph, dispatches it on the worker pool, and
//! processes the resulting notifications serially in submission order.
//! A lex notification stores the token stack and queues the parse; a
//! parse notification stores the AST, registers the file's imports, and
//! scans the tree for class names whose files still need lexing — the
//! next wave's work. The loop ends when a wave produces nothing new.
//!
//! A file is lexed at most once per run: the "currently lexing" set
//! covers the in-flight window, and a non-empty stack in the registry
//! covers everything already done.

mod error;

pub use error::InterpreterError;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use kli_flow::{Graph, Scheduler};
use kli_lex::Lexer;
use kli_par::{visit, NodeKind, ParseOutcome, Parser};
use kli_reg::Registry;
use kli_util::{FileIndex, TokenStack};

/// Pending lex task: the file is opened on the orchestrator thread so
/// open failures carry the path, and read on the worker.
struct LexWork {
    context: String,
    handle: File,
    file: FileIndex,
}

/// Pending parse task reading the file's stack through its `Arc`.
struct ParseWork {
    context: String,
    stack: Arc<TokenStack>,
    file: FileIndex,
}

/// Completion message produced by a work node and handled serially on
/// the orchestrator.
enum Notification {
    Lexed {
        file: FileIndex,
        context: String,
        result: Result<TokenStack, InterpreterError>,
    },
    Parsed {
        file: FileIndex,
        context: String,
        result: Result<ParseOutcome, InterpreterError>,
    },
}

/// The interpretation pipeline front-end.
pub struct Interpreter {
    registry: Registry,
    scheduler: Scheduler,
    to_lex: Vec<LexWork>,
    to_parse: Vec<ParseWork>,
    lexing: FxHashSet<FileIndex>,
}

impl Interpreter {
    /// Builds the pipeline; `workers` of `None` sizes the pool to the
    /// machine.
    pub fn new(workers: Option<usize>) -> Result<Self, InterpreterError> {
        Ok(Self {
            registry: Registry::new(),
            scheduler: Scheduler::new(workers)?,
            to_lex: Vec::new(),
            to_parse: Vec::new(),
            lexing: FxHashSet::default(),
        })
    }

    /// Processes the transitive closure of files reachable from
    /// `root_path` through imports and class references.
    ///
    /// Blocks until every reachable file has been lexed and parsed, or
    /// until the first fatal failure.
    pub fn run(&mut self, root_path: &Path) -> Result<(), InterpreterError> {
        let root = self.registry.discover_file(root_path)?;
        self.enqueue_lex(root)?;

        let mut graph: Graph<Notification> = Graph::new();
        let mut wave = 0u32;
        while !self.to_lex.is_empty() || !self.to_parse.is_empty() {
            for work in self.to_lex.drain(..) {
                graph.emplace(move || run_lex(work));
            }
            for work in self.to_parse.drain(..) {
                graph.emplace(move || run_parse(work));
            }
            wave += 1;
            debug!(wave, nodes = graph.len(), "dispatching wave");
            for notification in self.scheduler.dispatch(&mut graph) {
                self.process(notification)?;
            }
        }
        debug!(files = self.registry.file_count(), waves = wave, "pipeline settled");
        Ok(())
    }

    /// The registry with every slot filled by the run.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Opens a file and queues its lex task for the next wave.
    fn enqueue_lex(&mut self, file: FileIndex) -> Result<(), InterpreterError> {
        let path = self.registry.file_path(file);
        let context = path.display().to_string();
        let handle = File::open(path).map_err(|source| InterpreterError::CannotOpen {
            path: context.clone(),
            source,
        })?;
        trace!(context = %context, "queued for lexing");
        self.lexing.insert(file);
        self.to_lex.push(LexWork {
            context,
            handle,
            file,
        });
        Ok(())
    }

    fn process(&mut self, notification: Notification) -> Result<(), InterpreterError> {
        match notification {
            Notification::Lexed {
                file,
                context,
                result,
            } => {
                let stack = result?;
                trace!(context = %context, tokens = stack.count(), "file lexed");
                self.on_file_lexed(file, context, stack);
                Ok(())
            }
            Notification::Parsed {
                file,
                context,
                result,
            } => {
                let outcome = result?;
                trace!(context = %context, "file parsed");
                self.on_file_parsed(file, outcome)
            }
        }
    }

    /// Lex notify: store the stack and queue the parse task.
    fn on_file_lexed(&mut self, file: FileIndex, context: String, stack: TokenStack) {
        self.lexing.remove(&file);
        self.registry.set_stack(file, stack);
        let stack = Arc::clone(self.registry.stack(file));
        self.to_parse.push(ParseWork {
            context,
            stack,
            file,
        });
    }

    /// Parse notify: store the AST, register imports, and queue lexing
    /// for every referenced class file not yet seen.
    fn on_file_parsed(
        &mut self,
        file: FileIndex,
        outcome: ParseOutcome,
    ) -> Result<(), InterpreterError> {
        for import in &outcome.imports {
            let directory = self.registry.discover_directory(Path::new(import), false)?;
            self.registry.add_import(file, directory);
        }

        let mut class_names: Vec<String> = Vec::new();
        visit(&outcome.root, &mut |node| {
            if node.kind == NodeKind::Class {
                class_names.push(node.literal_lossy().into_owned());
            }
            true
        });
        self.registry.set_ast(file, outcome.root);

        for name in class_names {
            // A name matching no file may refer to the enclosing file
            // or to a built-in.
            let Some(target) = self.find_class_file(file, &name) else {
                continue;
            };
            if self.registry.stack(target).is_empty() && !self.lexing.contains(&target) {
                self.enqueue_lex(target)?;
            }
        }
        Ok(())
    }

    /// Resolves a class name to a file: the file's own directory first,
    /// then each imported directory in declaration order.
    fn find_class_file(&self, file: FileIndex, name: &str) -> Option<FileIndex> {
        let own = self.registry.file_directory(file);
        if let Some(found) = self.registry.find_in_directory(own, name) {
            return Some(found);
        }
        self.registry
            .imports(file)
            .iter()
            .find_map(|directory| self.registry.find_in_directory(*directory, name))
    }
}

/// Lex work node body, run on a worker thread. Failures are captured in
/// the notification, never thrown across the pool.
fn run_lex(work: LexWork) -> Notification {
    let LexWork {
        context,
        mut handle,
        file,
    } = work;
    let mut bytes = Vec::new();
    let result = match handle.read_to_end(&mut bytes) {
        Ok(_) => Lexer::new(file, &bytes, &context)
            .run()
            .map_err(InterpreterError::from),
        Err(source) => Err(InterpreterError::Read {
            path: context.clone(),
            source,
        }),
    };
    Notification::Lexed {
        file,
        context,
        result,
    }
}

/// Parse work node body, run on a worker thread.
fn run_parse(work: ParseWork) -> Notification {
    let ParseWork {
        context,
        stack,
        file,
    } = work;
    let result = Parser::new(&stack, &context)
        .run()
        .map_err(InterpreterError::from);
    Notification::Parsed {
        file,
        context,
        result,
    }
}
