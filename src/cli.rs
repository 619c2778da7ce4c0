use clap::{Parser, Subcommand, Args as ClapArgs};
use std::path::PathBuf;

/// Command-line arguments for the comfy-upload tool.
///
/// Global options select the server, configuration and report file; the
/// subcommand picks the upload flow.
#[derive(Parser, Debug)]
#[clap(name = "comfy-upload", about = "Upload images and folders to a ComfyUI input directory")]
pub struct Args {
    /// Server base URL (overrides the config file)
    #[clap(short, long, global = true)]
    pub server: Option<String>,

    /// Path to configuration YAML file
    #[clap(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Write a JSON report of the run to this path
    #[clap(long, global = true)]
    pub report: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List destination directories offered by the server
    Dirs,

    /// Upload image files directly into a destination directory
    Images(ImagesOpts),

    /// Upload one folder as a single archive
    Folder(FolderOpts),

    /// Upload a mix of files and folders as if dropped together
    Drop(DropOpts),

    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = "comfy-upload.yaml")]
        path: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ImagesOpts {
    /// Files to upload
    #[clap(required = true)]
    pub files: Vec<PathBuf>,

    /// Destination directory under the input root
    #[clap(short, long)]
    pub target_dir: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct FolderOpts {
    /// Folder to upload
    pub dir: PathBuf,

    /// Name to give the folder on the server
    #[clap(short, long)]
    pub name: Option<String>,

    /// Directory under the input root to place the folder in
    #[clap(short, long)]
    pub parent_dir: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct DropOpts {
    /// Files and folders to upload
    #[clap(required = true)]
    pub paths: Vec<PathBuf>,

    /// Directory under the input root for everything dropped
    #[clap(short, long)]
    pub parent_dir: Option<String>,
}
