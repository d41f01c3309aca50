mod common;

use pretty_assertions::assert_eq;

use donorlink::error::MatchError;
use donorlink::models::{MatchRequest, Profile, Role};
use donorlink::services::seed::seed_from_file;

use common::{fixture_path, seeded_service, test_state};

fn ids(matches: &[donorlink::models::MatchResult]) -> Vec<&str> {
    matches.iter().map(|m| m.profile_id.as_str()).collect()
}

#[tokio::test]
async fn seed_file_is_embedded_in_one_batch() {
    let (state, embedder) = test_state(None);

    let stored = seed_from_file(&state.matching, &fixture_path("profiles.json"))
        .await
        .unwrap();

    assert_eq!(stored, 5);
    assert_eq!(embedder.calls(), 1);
    assert_eq!(state.matching.count().await.unwrap(), 5);
}

#[tokio::test]
async fn patient_finds_local_compatible_donor_first() {
    let service = seeded_service().await;

    let request = MatchRequest {
        min_similarity: Some(0.5),
        ..MatchRequest::by_profile("p-alice")
    };
    let matches = service.find_top_matches(&request).await.unwrap();

    // Dan offers a liver and never shows up for a kidney patient
    assert_eq!(ids(&matches), vec!["d-bob", "d-carol"]);

    let bob = &matches[0];
    assert_eq!(bob.rank, 1);
    assert_eq!(bob.score_breakdown.location_score, 1.0);
    assert_eq!(bob.score_breakdown.blood_type_score, 1.0);
    assert_eq!(bob.score_breakdown.age_score, 1.0);
    assert!(bob.reason.contains("Kidney match"));
}

#[tokio::test]
async fn incompatible_blood_drags_donor_down() {
    let service = seeded_service().await;

    let request = MatchRequest {
        min_similarity: Some(0.0),
        ..MatchRequest::by_profile("p-alice")
    };
    let matches = service.find_top_matches(&request).await.unwrap();

    let bob = matches.iter().find(|m| m.profile_id == "d-bob").unwrap();
    let carol = matches.iter().find(|m| m.profile_id == "d-carol").unwrap();

    // AB- cannot supply O+
    assert_eq!(carol.score_breakdown.blood_type_score, 0.2);
    assert_eq!(carol.score_breakdown.location_score, 1.0);
    assert_eq!(carol.score_breakdown.age_score, 1.0);
    assert!(carol.hybrid_score < bob.hybrid_score);
    assert!(carol.rank > bob.rank);
}

#[tokio::test]
async fn donor_searches_for_patients() {
    let service = seeded_service().await;

    let request = MatchRequest {
        min_similarity: Some(0.0),
        ..MatchRequest::by_profile("d-dan")
    };
    let matches = service.find_top_matches(&request).await.unwrap();

    assert_eq!(ids(&matches), vec!["p-erin"]);
    let erin = &matches[0];
    assert_eq!(erin.profile.role, Role::Patient);
    // O- is the universal donor; Boston and Chicago only share a country
    assert_eq!(erin.score_breakdown.blood_type_score, 0.99);
    assert_eq!(erin.score_breakdown.location_score, 0.4);
    assert_eq!(erin.score_breakdown.age_score, 0.7);
}

#[tokio::test]
async fn free_text_query_infers_patient_role() {
    let service = seeded_service().await;

    let request = MatchRequest {
        min_similarity: Some(0.0),
        ..MatchRequest::by_text("I need a kidney, blood type O+, age 43")
    };
    let outcome = service.run_match(&request).await.unwrap();

    assert_eq!(outcome.query_text, "I need a kidney, blood type O+, age 43");
    assert!(outcome
        .matches
        .iter()
        .all(|m| m.profile.role == Role::Donor));
    assert_eq!(ids(&outcome.matches), vec!["d-bob", "d-carol"]);
    // no location on a free-text query
    assert_eq!(outcome.matches[0].score_breakdown.location_score, 0.5);
}

#[tokio::test]
async fn explicit_searcher_type_overrides_text_cues() {
    let service = seeded_service().await;

    let request = MatchRequest {
        searcher_type: Some(Role::Donor),
        min_similarity: Some(0.0),
        ..MatchRequest::by_text("Looking to help someone who needs a liver")
    };
    let matches = service.find_top_matches(&request).await.unwrap();

    assert_eq!(ids(&matches), vec!["p-erin"]);
}

#[tokio::test]
async fn similarity_floor_is_inclusive() {
    let service = seeded_service().await;

    let everything = MatchRequest {
        min_similarity: Some(0.0),
        ..MatchRequest::by_profile("p-alice")
    };
    let matches = service.find_top_matches(&everything).await.unwrap();
    let lowest = matches.last().unwrap().hybrid_score;

    let at_floor = MatchRequest {
        min_similarity: Some(lowest),
        ..MatchRequest::by_profile("p-alice")
    };
    assert_eq!(service.find_top_matches(&at_floor).await.unwrap().len(), matches.len());

    let above_floor = MatchRequest {
        min_similarity: Some(lowest + 1e-9),
        ..MatchRequest::by_profile("p-alice")
    };
    assert_eq!(
        service.find_top_matches(&above_floor).await.unwrap().len(),
        matches.len() - 1
    );
}

#[tokio::test]
async fn top_n_keeps_best_ranked() {
    let service = seeded_service().await;

    let request = MatchRequest {
        top_n: Some(1),
        min_similarity: Some(0.0),
        ..MatchRequest::by_profile("p-alice")
    };
    let matches = service.find_top_matches(&request).await.unwrap();

    assert_eq!(ids(&matches), vec!["d-bob"]);
    assert_eq!(matches[0].rank, 1);
}

#[tokio::test]
async fn removed_profile_no_longer_matches() {
    let service = seeded_service().await;

    service.remove_profile("d-bob").await.unwrap();

    let request = MatchRequest {
        min_similarity: Some(0.0),
        ..MatchRequest::by_profile("p-alice")
    };
    let matches = service.find_top_matches(&request).await.unwrap();
    assert_eq!(ids(&matches), vec!["d-carol"]);
    assert_eq!(matches[0].rank, 1);
}

#[tokio::test]
async fn restoring_a_profile_replaces_it() {
    let service = seeded_service().await;

    let updated = Profile {
        description: "Healthy kidney donor".to_string(),
        blood_type: Some("O-".to_string()),
        age: Some(40),
        country: Some("USA".to_string()),
        state: Some("MA".to_string()),
        city: Some("Boston".to_string()),
        organ_type: Some("Kidney".to_string()),
        ..Profile::new("d-bob", "Bob", Role::Donor)
    };
    service.store_profile(updated).await.unwrap();

    assert_eq!(service.count().await.unwrap(), 5);
    let bob = service.get_profile("d-bob").await.unwrap();
    assert_eq!(bob.blood_type.as_deref(), Some("O-"));
}

#[tokio::test]
async fn cleared_store_returns_no_matches() {
    let service = seeded_service().await;

    service.clear_all().await.unwrap();

    let matches = service
        .find_top_matches(&MatchRequest::by_text("I need a kidney"))
        .await
        .unwrap();
    assert!(matches.is_empty());

    let err = service
        .find_top_matches(&MatchRequest::by_profile("p-alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, MatchError::NotFound(_)));
}
