// tests/admin_tests.rs

mod common;

use common::{four_question_quiz, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn create_quiz_validates_payload() {
    let app = spawn_app().await;
    let (_, admin) = app.user("admin");

    let mut wrong_answer = four_question_quiz("Numerical Reasoning");
    wrong_answer["questions"][0]["correct_answer"] = json!("E");

    let mut no_questions = four_question_quiz("Numerical Reasoning");
    no_questions["questions"] = json!([]);

    let mut missing_explanation = four_question_quiz("Numerical Reasoning");
    missing_explanation["questions"][1]["explanation"] = json!("");

    for body in [wrong_answer, no_questions, missing_explanation, json!({ "title": "x" })] {
        let response = app
            .client
            .post(app.url("/api/admin/quizzes"))
            .bearer_auth(&admin)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 400, "{body}");
    }
}

#[tokio::test]
async fn create_quiz_applies_defaults_and_sanitizes_text() {
    let app = spawn_app().await;
    let (_, admin) = app.user("admin");

    let mut body = four_question_quiz("Verbal Reasoning");
    body.as_object_mut().unwrap().remove("time_limit");
    body["description"] = json!("<b>Words</b><script>alert(1)</script>");

    let quiz = app.create_quiz(&admin, body).await;

    assert_eq!(quiz["time_limit"], 45);
    assert_eq!(quiz["is_active"], true);
    assert_eq!(quiz["description"], "<b>Words</b>");
    assert_eq!(quiz["questions"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn update_and_soft_delete_quiz() {
    let app = spawn_app().await;
    let (_, admin) = app.user("admin");
    let quiz = app.create_quiz(&admin, four_question_quiz("Logical Reasoning")).await;
    let quiz_url = app.url(&format!("/api/admin/quizzes/{}", quiz["id"]));

    // Partial update keeps the questions
    let updated: Value = app
        .client
        .put(&quiz_url)
        .bearer_auth(&admin)
        .json(&json!({ "title": "Logical Reasoning II", "time_limit": 20 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["title"], "Logical Reasoning II");
    assert_eq!(updated["time_limit"], 20);
    assert_eq!(updated["questions"], quiz["questions"]);

    // An empty replacement question list is rejected
    let emptied = app
        .client
        .put(&quiz_url)
        .bearer_auth(&admin)
        .json(&json!({ "questions": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(emptied.status().as_u16(), 400);

    // Updates do not re-check correct answers against options
    let replaced: Value = app
        .client
        .put(&quiz_url)
        .bearer_auth(&admin)
        .json(&json!({ "questions": [{
            "prompt": "New question",
            "options": ["A", "B"],
            "correct_answer": "Z",
            "explanation": "Changed"
        }] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(replaced["questions"].as_array().unwrap().len(), 1);

    let deleted = app
        .client
        .delete(&quiz_url)
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    // Still listed for admins, marked inactive
    let all: Vec<Value> = app
        .client
        .get(app.url("/api/admin/quizzes"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["is_active"], false);

    let missing = app
        .client
        .delete(app.url("/api/admin/quizzes/999999"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn quiz_analytics_summarizes_attempts() {
    let app = spawn_app().await;
    let (_, admin) = app.user("admin");
    let quiz = app.create_quiz(&admin, four_question_quiz("Numerical Reasoning")).await;
    let analytics_url = app.url(&format!("/api/admin/quizzes/{}/analytics", quiz["id"]));
    let submit_url = app.url(&format!("/api/quizzes/{}/submit", quiz["id"]));
    let ids: Vec<i64> = quiz["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect();

    // No attempts yet
    let empty: Value = app
        .client
        .get(&analytics_url)
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty["total_attempts"], 0);
    assert_eq!(empty["score_distribution"], json!([0, 0, 0, 0, 0]));
    assert_eq!(empty["question_performance"], json!([]));
    assert_eq!(empty["recent_attempts"], json!([]));

    // Scores 25, 75, 100
    let (alice, alice_token) = app.user("user");
    let (_, bob_token) = app.user("user");
    let attempts = [
        (&alice_token, 1usize, 60),
        (&bob_token, 3, 120),
        (&alice_token, 4, 180),
    ];
    for (token, correct, seconds) in attempts {
        let answers: Vec<Value> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                json!({
                    "question_id": id,
                    "answer": if i < correct { "A" } else { "B" },
                    "time_taken": 10
                })
            })
            .collect();
        let response = app
            .client
            .post(&submit_url)
            .bearer_auth(token)
            .json(&json!({ "answers": answers, "time_spent": seconds }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let summary: Value = app
        .client
        .get(&analytics_url)
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary["total_attempts"], 3);
    assert_eq!(summary["average_score"], 200.0 / 3.0);
    assert_eq!(summary["passing_rate"], 200.0 / 3.0);
    assert_eq!(summary["average_time"], 2.0);
    assert_eq!(summary["score_distribution"], json!([0, 1, 0, 1, 1]));

    let perf = summary["question_performance"].as_array().unwrap();
    assert_eq!(perf.len(), 4);
    assert_eq!(perf[0]["total_attempts"], 3);
    assert_eq!(perf[0]["correct_count"], 3);
    assert_eq!(perf[0]["correct_rate"], 1.0);
    assert_eq!(perf[0]["average_time"], 10.0);
    assert_eq!(perf[3]["correct_count"], 1);

    let recent = summary["recent_attempts"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent.iter().any(|a| a["user_name"] == alice.username.as_str()));
}

#[tokio::test]
async fn recent_attempts_fall_back_to_anonymous() {
    let app = spawn_app().await;
    let (_, admin) = app.user("admin");
    let quiz = app.create_quiz(&admin, four_question_quiz("Verbal Reasoning")).await;

    // A token whose subject has no user record
    let ghost = common::token_for("777", "user");
    app.client
        .post(app.url(&format!("/api/quizzes/{}/submit", quiz["id"])))
        .bearer_auth(&ghost)
        .json(&json!({ "answers": [] }))
        .send()
        .await
        .unwrap();

    let summary: Value = app
        .client
        .get(app.url(&format!("/api/admin/quizzes/{}/analytics", quiz["id"])))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["recent_attempts"][0]["user_name"], "Anonymous");
}

#[tokio::test]
async fn analytics_overview_and_user_views() {
    let app = spawn_app().await;
    let (_, admin) = app.user("admin");
    let (learner, token) = app.user("user");
    let numerical = app.create_quiz(&admin, four_question_quiz("Numerical Reasoning")).await;
    let verbal = app.create_quiz(&admin, four_question_quiz("Verbal Reasoning")).await;

    for quiz in [&verbal, &numerical, &numerical] {
        app.client
            .post(app.url(&format!("/api/quizzes/{}/submit", quiz["id"])))
            .bearer_auth(&token)
            .json(&json!({ "answers": [], "time_spent": 30 }))
            .send()
            .await
            .unwrap();
    }

    let overview: Vec<Value> = app
        .client
        .get(app.url("/api/admin/analytics/quizzes"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(overview.len(), 2);
    assert_eq!(overview[0]["title"], "Numerical Reasoning");
    assert_eq!(overview[0]["total_attempts"], 2);
    assert_eq!(overview[0]["average_time_spent"], 1.0);
    assert_eq!(overview[1]["title"], "Verbal Reasoning");

    let users: Vec<Value> = app
        .client
        .get(app.url("/api/admin/users"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], learner.username.as_str());

    let detail: Value = app
        .client
        .get(app.url(&format!("/api/admin/users/{}", learner.id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["quizzes"].as_array().unwrap().len(), 3);
    assert_eq!(detail["quizzes"][0]["quiz_title"], "Verbal Reasoning");

    let missing = app
        .client
        .get(app.url("/api/admin/users/999999"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}
