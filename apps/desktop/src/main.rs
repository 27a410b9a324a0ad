use std::sync::Arc;

mod controller;
mod demo;

use anyhow::Result;
use clap::Parser;
use client_core::{ApiClient, StorySession, DEFAULT_API_BASE_URL};
use shared::domain::{Genre, SessionCode};

use controller::{
    events::UiEvent,
    state::{CreateForm, View},
    StoryApp,
};

#[derive(Parser, Debug)]
struct Args {
    /// Backend API origin.
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    server_url: String,
    /// Title for the scripted story creation.
    #[arg(long, default_value = "The Crystal Caverns")]
    title: String,
    /// Genre for the scripted story creation.
    #[arg(long, default_value = "fantasy")]
    genre: Genre,
    /// Opening prompt for the scripted story creation.
    #[arg(
        long,
        default_value = "You stand before the entrance to the Crystal Caverns, ancient runes glowing with an ethereal blue light."
    )]
    prompt: String,
    /// Join an existing multiplayer session instead of hosting one.
    #[arg(long)]
    join_code: Option<String>,
}

/// Stored genres are wire values; show the form's display label where one
/// maps, the raw string otherwise.
fn genre_label(genre: &str) -> &str {
    genre
        .parse::<Genre>()
        .map(|genre| genre.label())
        .unwrap_or(genre)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let api = ApiClient::new(&args.server_url)?;
    let session = StorySession::new(Arc::new(api));
    let mut app = StoryApp::new(session);

    app.startup().await;
    if app.state().connected {
        println!("Connected to backend at {}", args.server_url);
    } else {
        println!(
            "Backend unreachable at {}; running in demo mode",
            args.server_url
        );
    }

    println!("Your stories:");
    for story in &app.state().stories {
        println!(
            "  [{}] {} ({}) {}% complete",
            story.id.0,
            story.title,
            story.genre.as_deref().map(genre_label).unwrap_or("unknown"),
            story.progress.unwrap_or(0),
        );
    }

    // Peek at the first card the way the home screen's Continue button does.
    if let Some(first_card) = app.state().stories.first().map(|story| story.id) {
        app.open_story(first_card);
        app.go_home();
    }

    app.navigate(View::Create);
    let form = CreateForm {
        title: args.title,
        genre: Some(args.genre),
        prompt: args.prompt,
    };
    app.submit_create(form).await;

    if app.state().view == View::Story {
        if let Some(story) = &app.state().current_story {
            println!(
                "Now reading '{}' ({})",
                story.title,
                story.genre.as_deref().map(genre_label).unwrap_or("unknown"),
            );
        }
        if let Some(passage) = app.state().passage.clone() {
            println!("{}", passage.content);
            if passage.has_image {
                println!("  [ai illustration placeholder]");
            }
            if passage.has_audio {
                app.toggle_narration();
                if app.state().narrating {
                    println!("  [voice narration playing]");
                }
            }
            for (index, choice) in passage.choices.iter().enumerate() {
                println!("  {}. {choice}", index + 1);
            }
            if let Some(first) = passage.choices.first() {
                app.choose(0).await;
                println!("Chose '{first}'; the next passage is up to the backend storyteller.");
            }
        }

        app.export_current_story().await;

        app.navigate(View::Multiplayer);
        match args.join_code {
            Some(code) => app.join_multiplayer(SessionCode(code)).await,
            None => app.host_session().await,
        }
        app.go_home();
    }

    if let Some(alert) = app.take_alert() {
        println!("alert: {alert}");
    }
    for event in app.drain_events() {
        match event {
            UiEvent::Error(error) => println!(
                "error[{:?}/{:?}]: {}",
                error.category(),
                error.context(),
                error.message()
            ),
            other => println!("event: {other:?}"),
        }
    }

    Ok(())
}
