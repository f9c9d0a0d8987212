use crate::models::quiz::{NewQuestion, NewQuiz, QuizChanges};

/// Clean HTML content using the ammonia library.
///
/// Safe tags (like <b>, <p>) survive; <script> with its content, <iframe> and
/// event-handler attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Sanitizes the free-text fields of a question.
///
/// Options and the correct answer are compared verbatim against submissions and stay untouched.
pub fn clean_question(question: NewQuestion) -> NewQuestion {
    NewQuestion {
        prompt: clean_html(&question.prompt),
        explanation: clean_html(&question.explanation),
        ..question
    }
}

pub fn clean_quiz(quiz: NewQuiz) -> NewQuiz {
    NewQuiz {
        description: clean_html(&quiz.description),
        questions: quiz.questions.into_iter().map(clean_question).collect(),
        ..quiz
    }
}

pub fn clean_changes(changes: QuizChanges) -> QuizChanges {
    QuizChanges {
        description: changes.description.as_deref().map(clean_html),
        questions: changes
            .questions
            .map(|qs| qs.into_iter().map(clean_question).collect()),
        ..changes
    }
}
