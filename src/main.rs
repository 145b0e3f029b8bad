use clap::Parser;
use dotenv::dotenv;
use ladder_processor::{
    args::Args,
    database::{db::DbClient, db_structs::Match},
    model::{error::ProcessorError, processor::MatchOutcomeProcessor, store::CompetitionStore}
};
use serde_json::json;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let client = DbClient::connect(args.connection_string.as_str())
        .await
        .expect("Expected valid database connection");

    let store = client.load_store().await.expect("Expected store hydration to succeed");
    let mut processor = MatchOutcomeProcessor::new(store);

    if args.delete {
        let removed = unwrap_or_exit(processor.delete_match(args.match_id));
        client
            .persist_deletion(processor.store(), &removed)
            .await
            .expect("Expected match deletion to persist");

        println!("{}", deletion_summary(processor.store(), &removed));
    } else if let Some(value) = args.outcome {
        unwrap_or_exit(processor.update_outcome_value(args.match_id, value));
        client
            .persist_transition(processor.store(), args.match_id)
            .await
            .expect("Expected outcome transition to persist");

        println!("{}", transition_summary(processor.store(), args.match_id));
    } else {
        error!("nothing to do: pass --outcome or --delete");
        std::process::exit(2);
    }
}

fn unwrap_or_exit<T>(result: Result<T, ProcessorError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn transition_summary(store: &CompetitionStore, match_id: i32) -> String {
    match store.match_by_id(match_id) {
        Some(match_) => {
            let summary = json!({
                "match": match_,
                "participant1": store.participant(match_.participant_1_id),
                "participant2": store.participant(match_.participant_2_id),
                "participant1Stats": store.stats(match_.participant_1_id),
                "participant2Stats": store.stats(match_.participant_2_id)
            });
            summary.to_string()
        }
        None => json!({ "matchId": match_id }).to_string()
    }
}

fn deletion_summary(store: &CompetitionStore, removed: &Match) -> String {
    let summary = json!({
        "deletedMatchId": removed.id,
        "participant1": store.participant(removed.participant_1_id),
        "participant2": store.participant(removed.participant_2_id),
        "participant1Stats": store.stats(removed.participant_1_id),
        "participant2Stats": store.stats(removed.participant_2_id)
    });
    summary.to_string()
}
