use serde::Serialize;

pub const QUESTION_COUNT: u8 = 10;

/// Question whose non-zero answer flags thoughts of self-harm.
pub const SELF_HARM_QUESTION: u8 = 10;

/// One selectable answer; `value` is the points it contributes to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub text: &'static str,
    pub value: u8,
}

/// A single EPDS item with its four options in printed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub number: u8,
    pub prompt: &'static str,
    pub options: [AnswerOption; 4],
}

impl Question {
    pub fn accepts(&self, value: i64) -> bool {
        self.options
            .iter()
            .any(|option| i64::from(option.value) == value)
    }

    pub fn option_for(&self, value: u8) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionBankError {
    #[error("question {0} does not exist; expected 1 to 10")]
    NotFound(u32),
}

pub fn all_questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn get_question(number: u32) -> Result<&'static Question, QuestionBankError> {
    number
        .checked_sub(1)
        .and_then(|index| QUESTIONS.get(index as usize))
        .ok_or(QuestionBankError::NotFound(number))
}

const fn option(text: &'static str, value: u8) -> AnswerOption {
    AnswerOption { text, value }
}

static QUESTIONS: [Question; QUESTION_COUNT as usize] = [
    Question {
        number: 1,
        prompt: "I have been able to laugh and see the funny side of things",
        options: [
            option("As much as I always could", 0),
            option("Not quite so much now", 1),
            option("Definitely not so much now", 2),
            option("Not at all", 3),
        ],
    },
    Question {
        number: 2,
        prompt: "I have looked forward with enjoyment to things",
        options: [
            option("As much as I ever did", 0),
            option("Rather less than I used to", 1),
            option("Definitely less than I used to", 2),
            option("Hardly at all", 3),
        ],
    },
    Question {
        number: 3,
        prompt: "I have blamed myself unnecessarily when things went wrong",
        options: [
            option("Yes, most of the time", 3),
            option("Yes, some of the time", 2),
            option("Not very often", 1),
            option("No, never", 0),
        ],
    },
    Question {
        number: 4,
        prompt: "I have been anxious or worried for no good reason",
        options: [
            option("No, not at all", 0),
            option("Hardly ever", 1),
            option("Yes, sometimes", 2),
            option("Yes, very often", 3),
        ],
    },
    Question {
        number: 5,
        prompt: "I have felt scared or panicky for no very good reason",
        options: [
            option("Yes, quite a lot", 3),
            option("Yes, sometimes", 2),
            option("No, not much", 1),
            option("No, not at all", 0),
        ],
    },
    Question {
        number: 6,
        prompt: "Things have been getting on top of me",
        options: [
            option(
                "Yes, most of the time I haven't been able to cope at all",
                3,
            ),
            option("Yes, sometimes I haven't been coping as well as usual", 2),
            option("No, most of the time I have coped quite well", 1),
            option("No, I have been coping as well as ever", 0),
        ],
    },
    Question {
        number: 7,
        prompt: "I have been so unhappy that I have had difficulty sleeping",
        options: [
            option("Yes, most of the time", 3),
            option("Yes, sometimes", 2),
            option("Not very often", 1),
            option("No, not at all", 0),
        ],
    },
    Question {
        number: 8,
        prompt: "I have felt sad or miserable",
        options: [
            option("Yes, most of the time", 3),
            option("Yes, quite often", 2),
            option("Not very often", 1),
            option("No, not at all", 0),
        ],
    },
    Question {
        number: 9,
        prompt: "I have been so unhappy that I have been crying",
        options: [
            option("Yes, most of the time", 3),
            option("Yes, quite often", 2),
            option("Only occasionally", 1),
            option("No, never", 0),
        ],
    },
    Question {
        number: 10,
        prompt: "The thought of harming myself has occurred to me",
        options: [
            option("Never", 0),
            option("Hardly ever", 1),
            option("Sometimes", 2),
            option("Yes, quite often", 3),
        ],
    },
];
