use clap::Parser;
use trivserv::config::Config;
use trivserv::source::OpenTdbDump;
use trivserv::storage::JsonStorage;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = Config::parse();

    let mut storage = JsonStorage::new(&config.users, &config.questions);
    if config.reset {
        let mut source = OpenTdbDump::new(&config.question_dump);
        storage.reset(&config.users_backup, &mut source, config.questions_to_load)?;
    }
    let mut trivia = trivserv::Trivia::load(&mut storage)?;
    let mut network = trivserv::Network::bind(config.address(), config.max_queued.into())?;

    network.serve(&mut trivia, &mut storage)?;
    Ok(())
}
