//! The two variant configurations as data: stage plans, item lists,
//! thresholds, timer cadences, and the story script. Nothing in here is
//! consulted after construction — `BakeryState::new` takes a snapshot.

use super::state::{
    Character, Decoration, DialogueLine, DialogueScript, Emotion, GameConfig, Guard, Ingredient,
    Stage, StageNode,
};

/// Bake progress gained per 100ms tick; 50 ticks to a full sponge.
const OVEN_INCREMENT: u32 = 2;
/// Ticks between reaching 100 and the oven-done event (500ms).
const OVEN_SETTLE_TICKS: u32 = 5;
/// Length of the story blackout interstitial (2.5s).
const BLACKOUT_TICKS: u32 = 25;

fn ingredients() -> Vec<Ingredient> {
    let item = |id, name, icon, required, special| Ingredient {
        id,
        name,
        icon,
        required,
        current: 0,
        special,
    };
    vec![
        item("egg", "卵", "🥚", 3, false),
        item("milk", "牛乳", "🥛", 1, false),
        item("flour", "小麦粉", "🌾", 2, false),
        item("sugar", "砂糖", "🍬", 2, false),
        item("salt", "塩", "🧂", 1, false),
        item("vanilla", "バニラ", "🌼", 1, true),
    ]
}

fn decorations() -> Vec<Decoration> {
    let item = |id, name, icon| Decoration {
        id,
        name,
        icon,
        added: false,
    };
    vec![
        item("strawberry", "いちご", "🍓"),
        item("cherry", "さくらんぼ", "🍒"),
        item("sprinkles", "スプリンクル", "✨"),
        item("raspberry", "ラズベリージャム", "🫐"),
        item("cone", "バニラコーン", "🍦"),
    ]
}

/// Classic mode: pick a cookie on the title screen and bake straight
/// through. Three decorations minimum.
pub fn classic() -> GameConfig {
    let node = |stage, guard| StageNode { stage, guard };
    GameConfig {
        title: "バニラケーキ工房",
        plan: vec![
            node(Stage::Start, Guard::Open),
            node(Stage::Ingredients, Guard::Open),
            node(Stage::Baking, Guard::RecipeComplete),
            node(Stage::Decoration, Guard::BakeDone),
            node(Stage::Complete, Guard::DecorationsReady),
        ],
        ingredients: ingredients(),
        decorations: decorations(),
        min_decorations: 3,
        oven_increment: OVEN_INCREMENT,
        oven_settle_ticks: OVEN_SETTLE_TICKS,
        blackout_ticks: BLACKOUT_TICKS,
        script: DialogueScript::empty(),
        fixed_character: None,
    }
}

/// Story mode: three dialogue phases, the lights go out, and the cake is
/// finished in the shadow kitchen. Two decorations minimum.
pub fn story() -> GameConfig {
    let node = |stage, guard| StageNode { stage, guard };
    GameConfig {
        title: "影のキッチン",
        plan: vec![
            node(Stage::Intro, Guard::Open),
            node(Stage::DialogueOne, Guard::DialogueExhausted),
            node(Stage::DialogueTwo, Guard::DialogueExhausted),
            node(Stage::Blackout, Guard::DialogueExhausted),
            node(Stage::ShadowKitchen, Guard::TimerElapsed),
            node(Stage::Ingredients, Guard::Open),
            node(Stage::Baking, Guard::RecipeComplete),
            node(Stage::Decoration, Guard::BakeDone),
            node(Stage::Complete, Guard::DecorationsReady),
        ],
        ingredients: ingredients(),
        decorations: decorations(),
        min_decorations: 2,
        oven_increment: OVEN_INCREMENT,
        oven_settle_ticks: OVEN_SETTLE_TICKS,
        blackout_ticks: BLACKOUT_TICKS,
        script: story_script(),
        fixed_character: Some(Character::ShadowMilk),
    }
}

/// The story conversation. Three phases; the last line of the last phase
/// cues the blackout.
fn story_script() -> DialogueScript {
    use Character::{PureVanilla, ShadowMilk};
    let line = |speaker, emotion, text| DialogueLine {
        speaker,
        text,
        emotion,
    };
    DialogueScript {
        phases: vec![
            // intro — the invitation
            vec![
                line(PureVanilla, Emotion::Gentle, "ようこそ、バニラ王国のキッチンへ。今日は特別なケーキを焼きましょう"),
                line(ShadowMilk, Emotion::Mischief, "ふふっ……純粋なバニラの香りだ。少し混ぜっ返したくなるなあ?"),
                line(PureVanilla, Emotion::Cheerful, "いたずらはほどほどに。材料はとても繊細なのですから"),
                line(ShadowMilk, Emotion::Laugh, "約束はできないね。さあ、始めようか!"),
            ],
            // dialogue1 — over the mixing bowl
            vec![
                line(PureVanilla, Emotion::Gentle, "まずはレシピの確認を。卵、牛乳、小麦粉……どれも欠かせません"),
                line(ShadowMilk, Emotion::Cheerful, "きみのレシピは几帳面すぎるよ。秘密のひとさじが足りない"),
                line(PureVanilla, Emotion::Surprised, "秘密のひとさじ、ですか?"),
                line(ShadowMilk, Emotion::Mischief, "それは……できてからのお楽しみ"),
            ],
            // dialogue2 — ends with the lights going out
            vec![
                line(PureVanilla, Emotion::Cheerful, "オーブンの予熱もできました。あとは焼くだけですね"),
                line(ShadowMilk, Emotion::Dark, "ねえ。本当においしいケーキには、影のスパイスが要ると思わない?"),
                line(PureVanilla, Emotion::Surprised, "シャドウミルク? なんだか嫌な予感が……"),
                line(ShadowMilk, Emotion::Laugh, "あはははっ! それじゃあ——"),
                line(ShadowMilk, Emotion::Dark, "……おやすみ、灯り"),
            ],
        ],
    }
}
