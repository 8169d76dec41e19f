// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: database path
fn database_arg() -> Arg {
    Arg::new("database")
        .short('d')
        .long("database")
        .value_name("PATH")
        .help("Database file (default: $APP_INSTALL_DB or /var/lib/app-install/desktop.db)")
}

/// Common argument: icon directory
fn icondir_arg() -> Arg {
    Arg::new("icondir")
        .short('i')
        .long("icondir")
        .value_name("DIR")
        .help("Icon directory")
}

fn repo_arg() -> Arg {
    Arg::new("repo")
        .short('r')
        .long("repo")
        .help("Repository id")
}

fn package_arg() -> Arg {
    Arg::new("package")
        .short('p')
        .long("package")
        .help("Package name")
}

fn dist_arg() -> Arg {
    Arg::new("dist")
        .short('d')
        .long("dist")
        .required(true)
        .help("Output directory")
}

fn sql_arg() -> Arg {
    Arg::new("sql")
        .long("sql")
        .action(ArgAction::SetTrue)
        .help("Also write the database as SQL statements")
}

fn build_cli() -> Command {
    Command::new("app-install")
        .version(env!("CARGO_PKG_VERSION"))
        .author("app-install Contributors")
        .about("Desktop application metadata cache for package repositories")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show extra debugging information"),
        )
        .subcommand(
            Command::new("create")
                .about("Create an empty application database")
                .arg(database_arg())
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Remove an existing database first"),
                ),
        )
        .subcommand(
            Command::new("upgrade")
                .about("Upgrade a database to the current schema")
                .arg(database_arg()),
        )
        .subcommand(
            Command::new("refresh-installed")
                .about("Mark the applications installed on this system")
                .arg(database_arg())
                .arg(
                    Arg::new("local_application_root")
                        .long("local-application-root")
                        .default_value("/usr/share/applications")
                        .help("Directory holding the installed desktop files"),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Copy applications from another database")
                .arg(database_arg())
                .arg(
                    Arg::new("source_database")
                        .long("source-database")
                        .required(true)
                        .help("Database to copy applications from"),
                )
                .arg(icondir_arg())
                .arg(
                    Arg::new("source_icondir")
                        .long("source-icondir")
                        .help("Icon directory of the source database"),
                )
                .arg(repo_arg())
                .arg(package_arg()),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove applications from the database")
                .arg(database_arg())
                .arg(icondir_arg())
                .arg(repo_arg())
                .arg(package_arg()),
        )
        .subcommand(
            Command::new("query")
                .about("Search the database")
                .arg(database_arg())
                .arg(Arg::new("locale").long("locale").help("Locale for translated names"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print results as JSON"),
                )
                .subcommand(
                    Command::new("id")
                        .about("Search application ids")
                        .arg(Arg::new("term").required(true)),
                )
                .subcommand(
                    Command::new("name")
                        .about("Search application names, including translated names")
                        .arg(Arg::new("term").required(true)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Add one desktop file of an unpacked package to the database")
                .arg(database_arg())
                .arg(
                    Arg::new("root")
                        .short('r')
                        .long("root")
                        .default_value("/")
                        .help("Root directory of the package data"),
                )
                .arg(
                    Arg::new("desktopfile")
                        .short('f')
                        .long("desktopfile")
                        .required(true)
                        .help("Desktop file name, or absolute path inside the root"),
                )
                .arg(package_arg().required(true))
                .arg(icondir_arg().required(true))
                .arg(
                    Arg::new("repo")
                        .short('n')
                        .long("repo")
                        .required(true)
                        .help("Name of the remote repository"),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Unpack a package archive (RPM, tarball or Pisi)")
                .arg(package_arg().required(true).help("Package file"))
                .arg(
                    Arg::new("directory")
                        .short('d')
                        .long("directory")
                        .required(true)
                        .help("Directory to unpack into"),
                ),
        )
        .subcommand(
            Command::new("build")
                .about("Build the database and icon archive for a whole repository")
                .subcommand(
                    Command::new("yum")
                        .about("Build from a yum repository")
                        .arg(repo_arg().required(true))
                        .arg(dist_arg())
                        .arg(Arg::new("baseurl").long("baseurl").help("Repository base URL or local path"))
                        .arg(
                            Arg::new("repos_dir")
                                .long("repos-dir")
                                .default_value("/etc/yum.repos.d")
                                .help("Directory holding .repo files"),
                        )
                        .arg(Arg::new("releasever").long("releasever").help("Value of $releasever"))
                        .arg(sql_arg()),
                )
                .subcommand(
                    Command::new("pisi")
                        .about("Build from a pisi repository")
                        .arg(repo_arg().required(true))
                        .arg(dist_arg())
                        .arg(Arg::new("index").long("index").help("Location of pisi-index.xml"))
                        .arg(
                            Arg::new("installed_dir")
                                .long("installed-dir")
                                .default_value("/var/lib/pisi/package")
                                .help("Directory of the installed-package database"),
                        )
                        .arg(sql_arg()),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("app-install.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
