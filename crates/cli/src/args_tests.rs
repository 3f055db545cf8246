use super::*;
use yare::parameterized;

#[parameterized(
    master = { &["mr", "master"] },
    worker = { &["mr", "worker", "--master-url", "127.0.0.1:7070"] },
    run_serial = { &["mr", "run", "serial"] },
    run_mockparallel = { &["mr", "run", "mockparallel"] },
)]
fn subcommands_parse_with_only_their_required_flags(argv: &[&str]) {
    Cli::try_parse_from(argv).expect("should parse");
}

#[test]
fn master_defaults_to_port_7070_on_all_interfaces() {
    let cli = Cli::try_parse_from(["mr", "master"]).expect("should parse");
    let Command::Master(shared) = cli.command else { panic!("expected Master") };
    assert_eq!(shared.listen_addr(7070), SocketAddr::from(([0, 0, 0, 0], 7070)));
}

#[test]
fn explicit_listen_address_overrides_the_default_port() {
    let cli = Cli::try_parse_from(["mr", "worker", "--listen", "127.0.0.1:9100"]).expect("should parse");
    let Command::Worker(shared) = cli.command else { panic!("expected Worker") };
    assert_eq!(shared.listen_addr(7071), "127.0.0.1:9100".parse().expect("valid addr"));
}

#[test]
fn mockparallel_worker_count_defaults_to_two() {
    let cli = Cli::try_parse_from(["mr", "run", "mockparallel"]).expect("should parse");
    let Command::Run { mode: RunMode::Mockparallel { workers, .. } } = cli.command else {
        panic!("expected Mockparallel")
    };
    assert_eq!(workers, 2);
}

#[test]
fn mockparallel_worker_count_is_overridable() {
    let cli = Cli::try_parse_from(["mr", "run", "mockparallel", "--workers", "5"]).expect("should parse");
    let Command::Run { mode: RunMode::Mockparallel { workers, .. } } = cli.command else {
        panic!("expected Mockparallel")
    };
    assert_eq!(workers, 5);
}

#[test]
fn reduce_tasks_falls_back_to_the_environment_default_when_unset() {
    let cli = Cli::try_parse_from(["mr", "master"]).expect("should parse");
    let Command::Master(shared) = cli.command else { panic!("expected Master") };
    assert_eq!(shared.reduce_tasks(), env::default_reduce_tasks());
}

#[test]
fn keep_jobdir_defaults_to_false() {
    let cli = Cli::try_parse_from(["mr", "run", "serial"]).expect("should parse");
    let Command::Run { mode: RunMode::Serial(shared) } = cli.command else { panic!("expected Serial") };
    assert!(!shared.keep_jobdir);
}
