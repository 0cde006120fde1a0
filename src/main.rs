mod buddy;
mod config;
mod render;

use std::sync::Arc;

use buddy::{
    gateway::{ChatGptGateway, Generator},
    history::HistoryEntry,
    session::{InputError, Session},
    Difficulty, Mode, ResponseLength, Settings,
};
use chatgpt::client::ChatGPT;
use config::Config;
use dotenv::dotenv;
use teloxide::{
    dispatching::dialogue::{ErasedStorage, InMemStorage, Storage},
    prelude::*,
    types::{ChatAction, ChatId, KeyboardButton, KeyboardMarkup},
};

type BuddyDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type Gateway = Arc<dyn Generator>;

/// Each chat gets its own dialogue, so each chat owns an independent `Session`.
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    Menu {
        session: Session,
    },
    ReceiveTopic {
        session: Session,
    },
    ReceiveSubject {
        session: Session,
    },
    SettingsMenu {
        session: Session,
    },
    ReceiveDifficulty {
        session: Session,
    },
    ReceiveResponseLength {
        session: Session,
    },
    ReceiveMode {
        session: Session,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting learning buddy bot...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let gateway: Gateway = match build_gateway(config) {
        Ok(gateway) => Arc::new(gateway),
        Err(err) => {
            log::error!("Unable to connect with ChatGPT: {}", err);
            std::process::exit(1);
        }
    };

    let bot = Bot::from_env();

    // History lives only as long as the process.
    let storage: Arc<ErasedStorage<State>> = InMemStorage::<State>::new().erase();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::Menu { session }].endpoint(menu))
            .branch(dptree::case![State::ReceiveTopic { session }].endpoint(receive_topic))
            .branch(dptree::case![State::ReceiveSubject { session }].endpoint(receive_subject))
            .branch(dptree::case![State::SettingsMenu { session }].endpoint(settings_menu))
            .branch(
                dptree::case![State::ReceiveDifficulty { session }].endpoint(receive_difficulty),
            )
            .branch(
                dptree::case![State::ReceiveResponseLength { session }]
                    .endpoint(receive_response_length),
            )
            .branch(dptree::case![State::ReceiveMode { session }].endpoint(receive_mode)),
    )
    .dependencies(dptree::deps![storage, gateway])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

fn build_gateway(config: Config) -> Result<ChatGptGateway, chatgpt::err::Error> {
    let Some(api_key) = config.api_key else {
        log::warn!("CHATGPT_API_KEY not found, every request will fail until it is set");
        return Ok(ChatGptGateway::without_credentials());
    };

    let mut gpt = ChatGPT::new(api_key)?;
    gpt.config.engine = config.engine;
    gpt.config.timeout = config.timeout;

    Ok(ChatGptGateway::new(gpt))
}

const LEARN: &str = "📖 Learn";
const QUIZ: &str = "📝 Quiz";
const HISTORY: &str = "📜 History";
const CLEAR_HISTORY: &str = "🧹 Clear history";
const SETTINGS: &str = "⚙️ Settings";

const DIFFICULTY: &str = "Difficulty";
const RESPONSE_LENGTH: &str = "Response length";
const LEARNING_MODE: &str = "Learning mode";
const BACK: &str = "⬅️ Back";

const MENU_BUTTONS: [&str; 5] = [LEARN, QUIZ, HISTORY, CLEAR_HISTORY, SETTINGS];

const GREETING_TEXT: &str = "📘 Interactive Learning Buddy\n\
    Your AI-powered companion to learn smarter, test yourself and track progress. 🚀\n\n\
    Pick Learn or Quiz, or just send me a topic.";

fn main_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(LEARN), KeyboardButton::new(QUIZ)],
        vec![
            KeyboardButton::new(HISTORY),
            KeyboardButton::new(CLEAR_HISTORY),
        ],
        vec![KeyboardButton::new(SETTINGS)],
    ])
}

fn settings_keyboard() -> KeyboardMarkup {
    choice_keyboard([DIFFICULTY, RESPONSE_LENGTH, LEARNING_MODE, BACK])
}

fn choice_keyboard<const N: usize>(labels: [&str; N]) -> KeyboardMarkup {
    KeyboardMarkup::new(
        labels
            .iter()
            .map(|label| vec![KeyboardButton::new(*label)])
            .collect::<Vec<_>>(),
    )
}

async fn start(bot: Bot, dialogue: BuddyDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT)
        .reply_markup(main_keyboard())
        .await?;

    dialogue
        .update(State::Menu {
            session: Session::new(Settings::default()),
        })
        .await?;
    Ok(())
}

async fn menu(
    bot: Bot,
    dialogue: BuddyDialogue,
    mut session: Session,
    gateway: Gateway,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        None => {
            bot.send_message(msg.chat.id, "Please send me text")
                .await?;
        }
        Some(text) if is_command(text) => {
            bot.send_message(msg.chat.id, GREETING_TEXT)
                .reply_markup(main_keyboard())
                .await?;
            dialogue.update(State::Menu { session }).await?;
        }
        Some(LEARN) => {
            bot.send_message(msg.chat.id, "📖 Enter a topic to explore:")
                .await?;
            dialogue.update(State::ReceiveTopic { session }).await?;
        }
        Some(QUIZ) => {
            bot.send_message(msg.chat.id, "📝 Enter a subject for quiz:")
                .await?;
            dialogue.update(State::ReceiveSubject { session }).await?;
        }
        Some(HISTORY) => {
            show_history(&bot, msg.chat.id, &session).await?;
        }
        Some(CLEAR_HISTORY) => {
            session.clear_history();
            dialogue.update(State::Menu { session }).await?;
            bot.send_message(msg.chat.id, "🧹 History cleared.")
                .reply_markup(main_keyboard())
                .await?;
        }
        Some(SETTINGS) => {
            show_settings(&bot, msg.chat.id, &session).await?;
            dialogue.update(State::SettingsMenu { session }).await?;
        }
        Some(text) => {
            // Free text goes to whichever mode is selected in the settings.
            send_typing(&bot, msg.chat.id, text).await;
            let outcome = record_request(&dialogue, session, &gateway, text, None).await?;
            reply_to_request(&bot, msg.chat.id, outcome).await?;
        }
    }
    Ok(())
}

async fn receive_topic(
    bot: Bot,
    dialogue: BuddyDialogue,
    session: Session,
    gateway: Gateway,
    msg: Message,
) -> HandlerResult {
    if is_menu_action(&msg) {
        return menu(bot, dialogue, session, gateway, msg).await;
    }
    let text = msg.text().unwrap_or_default();
    send_typing(&bot, msg.chat.id, text).await;
    let outcome = record_request(&dialogue, session, &gateway, text, Some(Mode::Learn)).await?;
    reply_to_request(&bot, msg.chat.id, outcome).await
}

async fn receive_subject(
    bot: Bot,
    dialogue: BuddyDialogue,
    session: Session,
    gateway: Gateway,
    msg: Message,
) -> HandlerResult {
    if is_menu_action(&msg) {
        return menu(bot, dialogue, session, gateway, msg).await;
    }
    let text = msg.text().unwrap_or_default();
    send_typing(&bot, msg.chat.id, text).await;
    let outcome = record_request(&dialogue, session, &gateway, text, Some(Mode::Quiz)).await?;
    reply_to_request(&bot, msg.chat.id, outcome).await
}

/// Menu buttons and bot commands are never sent to the model as a topic.
fn is_menu_action(msg: &Message) -> bool {
    msg.text()
        .map_or(false, |text| MENU_BUTTONS.contains(&text) || is_command(text))
}

fn is_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

async fn send_typing(bot: &Bot, chat_id: ChatId, text: &str) {
    if !text.trim().is_empty() {
        // Only a nicety, the reply matters more than the indicator
        let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;
    }
}

/// Runs one request and stores the updated session before anything is sent back,
/// so a failed reply cannot drop the new history entry. `None` uses the mode
/// from the settings.
///
/// Blank input comes back as `Err(InputError)`: nothing was sent to the model
/// and the dialogue stays where it is.
async fn record_request(
    dialogue: &BuddyDialogue,
    mut session: Session,
    gateway: &Gateway,
    text: &str,
    kind: Option<Mode>,
) -> Result<Result<HistoryEntry, InputError>, Box<dyn std::error::Error + Send + Sync>> {
    let result = match kind {
        Some(Mode::Learn) => session.learn(&**gateway, text).await,
        Some(Mode::Quiz) => session.quiz(&**gateway, text).await,
        None => session.ask(&**gateway, text).await,
    };

    if result.is_ok() {
        dialogue.update(State::Menu { session }).await?;
    }
    Ok(result)
}

async fn reply_to_request(
    bot: &Bot,
    chat_id: ChatId,
    outcome: Result<HistoryEntry, InputError>,
) -> HandlerResult {
    let entry = match outcome {
        Ok(entry) => entry,
        Err(warning) => {
            bot.send_message(chat_id, warning.to_string()).await?;
            return Ok(());
        }
    };

    let header = match (entry.response().is_failed(), entry.kind()) {
        (true, _) => "Something went wrong:",
        (false, Mode::Learn) => "Here’s what I found:",
        (false, Mode::Quiz) => "Here’s your quiz:",
    };
    let reply = format!("{}\n\n{}", header, entry.response().text());
    send_long(bot, chat_id, &reply).await
}

async fn send_long(bot: &Bot, chat_id: ChatId, text: &str) -> HandlerResult {
    for part in render::split_message(text, render::MESSAGE_LIMIT) {
        bot.send_message(chat_id, part)
            .reply_markup(main_keyboard())
            .await?;
    }
    Ok(())
}

async fn show_history(bot: &Bot, chat_id: ChatId, session: &Session) -> HandlerResult {
    let history = session.history();
    if history.is_empty() {
        bot.send_message(chat_id, render::EMPTY_HISTORY)
            .reply_markup(main_keyboard())
            .await?;
        return Ok(());
    }

    bot.send_message(
        chat_id,
        format!("📜 Your Learning & Quiz History ({})", history.len()),
    )
    .await?;
    for block in render::history_blocks(history) {
        send_long(bot, chat_id, &block).await?;
    }
    Ok(())
}

async fn show_settings(bot: &Bot, chat_id: ChatId, session: &Session) -> HandlerResult {
    let text = format!(
        "⚙️ Your settings:\n{}\n\nWhat would you like to change?",
        render::settings_json(&session.settings)
    );
    bot.send_message(chat_id, text)
        .reply_markup(settings_keyboard())
        .await?;
    Ok(())
}

async fn settings_menu(
    bot: Bot,
    dialogue: BuddyDialogue,
    session: Session,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(DIFFICULTY) => {
            bot.send_message(msg.chat.id, "Select Difficulty:")
                .reply_markup(choice_keyboard(Difficulty::ALL.map(|d| d.label())))
                .await?;
            dialogue.update(State::ReceiveDifficulty { session }).await?;
        }
        Some(RESPONSE_LENGTH) => {
            bot.send_message(msg.chat.id, "Response Length:")
                .reply_markup(choice_keyboard(ResponseLength::ALL.map(|l| l.label())))
                .await?;
            dialogue
                .update(State::ReceiveResponseLength { session })
                .await?;
        }
        Some(LEARNING_MODE) => {
            bot.send_message(msg.chat.id, "Learning Mode:")
                .reply_markup(choice_keyboard(Mode::ALL.map(|m| m.label())))
                .await?;
            dialogue.update(State::ReceiveMode { session }).await?;
        }
        Some(BACK) => {
            bot.send_message(msg.chat.id, "Back to the main menu.")
                .reply_markup(main_keyboard())
                .await?;
            dialogue.update(State::Menu { session }).await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Please choose one of the options")
                .reply_markup(settings_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn receive_difficulty(
    bot: Bot,
    dialogue: BuddyDialogue,
    mut session: Session,
    msg: Message,
) -> HandlerResult {
    match msg.text().and_then(Difficulty::from_label) {
        Some(difficulty) => {
            session.settings.difficulty = difficulty;
            log::debug!("Chat {} switched difficulty to {:?}", msg.chat.id.0, difficulty);
            settings_updated(bot, dialogue, session, msg.chat.id).await
        }
        None => choose_again(&bot, msg.chat.id, Difficulty::ALL.map(|d| d.label())).await,
    }
}

async fn receive_response_length(
    bot: Bot,
    dialogue: BuddyDialogue,
    mut session: Session,
    msg: Message,
) -> HandlerResult {
    match msg.text().and_then(ResponseLength::from_label) {
        Some(length) => {
            session.settings.response_length = length;
            log::debug!("Chat {} switched response length to {:?}", msg.chat.id.0, length);
            settings_updated(bot, dialogue, session, msg.chat.id).await
        }
        None => choose_again(&bot, msg.chat.id, ResponseLength::ALL.map(|l| l.label())).await,
    }
}

async fn receive_mode(
    bot: Bot,
    dialogue: BuddyDialogue,
    mut session: Session,
    msg: Message,
) -> HandlerResult {
    match msg.text().and_then(Mode::from_label) {
        Some(mode) => {
            session.settings.mode = mode;
            log::debug!("Chat {} switched mode to {:?}", msg.chat.id.0, mode);
            settings_updated(bot, dialogue, session, msg.chat.id).await
        }
        None => choose_again(&bot, msg.chat.id, Mode::ALL.map(|m| m.label())).await,
    }
}

async fn settings_updated(
    bot: Bot,
    dialogue: BuddyDialogue,
    session: Session,
    chat_id: ChatId,
) -> HandlerResult {
    show_settings(&bot, chat_id, &session).await?;
    dialogue.update(State::SettingsMenu { session }).await?;
    Ok(())
}

async fn choose_again<const N: usize>(
    bot: &Bot,
    chat_id: ChatId,
    labels: [&str; N],
) -> HandlerResult {
    bot.send_message(chat_id, "Please choose one of the options")
        .reply_markup(choice_keyboard(labels))
        .await?;
    Ok(())
}
