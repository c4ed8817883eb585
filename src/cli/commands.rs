use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "testdoc",
    version,
    about = "Pair compiled Java test methods with their source text",
    after_help = "Classes are read from the configured classpath directories \
                  (see .testdoc/config.toml). Sources are looked up next to the classes \
                  first, then anywhere below the project root."
)]
pub struct Cli {
    /// Log discovery decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by commands that read a project.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root, also the root of the source scan (default: current directory)
    #[arg(long)]
    pub root: Option<String>,

    /// Classpath directory, relative to the project root; repeatable.
    /// Replaces the configured classpath when given.
    #[arg(long = "classpath", short = 'c')]
    pub classpath: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Discover test methods of one or more classes and print them with
    /// their source.
    ///
    /// Walks each class's superclass chain; inherited tests follow the
    /// class's own tests. Classes whose source cannot be found contribute
    /// nothing; a source file that exists but does not parse is an error.
    Discover {
        /// Binary class names (e.g. com.acme.FooTest or com.acme.Outer$Inner)
        #[arg(required = true)]
        classes: Vec<String>,

        #[command(flatten)]
        project: ProjectArgs,

        /// Additional test marker annotation (fully-qualified); repeatable
        #[arg(long = "marker", short = 'm')]
        markers: Vec<String>,

        /// Continue past syntax errors in source files
        #[arg(long)]
        lenient: bool,
    },

    /// Show where the source file of a class is found.
    Locate {
        /// Binary class name
        class: String,

        #[command(flatten)]
        project: ProjectArgs,
    },

    /// List the effective test marker annotations.
    Markers {
        /// Project root (default: current directory)
        #[arg(long)]
        root: Option<String>,
    },

    /// Write a default .testdoc/config.toml.
    Init {
        /// Project root directory (default: current directory)
        #[arg(default_value = ".")]
        path: String,
    },
}
