use std::path::Path;

use anyhow::{Context, Result, bail};

use flame_client::onboarding::{Advance, OnboardingFlow, OnboardingStep};
use flame_client::profile::{ProfileEditor, SaveOutcome};
use flame_client::{AppContextInner, Route, ViewScope};

use super::Input;
use crate::ProfileAction;
use crate::render;

async fn editor(ctx: &AppContextInner) -> Result<ProfileEditor> {
    ProfileEditor::load(ctx, ViewScope::new())
        .await?
        .context("Profile view closed before it loaded")
}

fn print_saved(editor: &ProfileEditor, outcome: Option<SaveOutcome>) {
    if let Some(line) = render::notice(editor.notice()) {
        println!("{line}");
    }
    if outcome == Some(SaveOutcome::ProceedToFeed) {
        println!("{}", render::route_hint(&Route::Feed));
    }
}

async fn upload(editor: &mut ProfileEditor, ctx: &AppContextInner, path: &Path, primary: bool) -> Result<()> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo.jpg")
        .to_string();
    editor.upload_photo(ctx, data, &file_name, primary).await?;
    Ok(())
}

pub async fn run(ctx: &AppContextInner, action: ProfileAction) -> Result<()> {
    let mut editor = editor(ctx).await?;

    match action {
        ProfileAction::Show => {
            print!("{}", render::profile(&editor));
        }
        ProfileAction::Set {
            age,
            gender,
            bio,
            institution,
            lat,
            lon,
        } => {
            if let Some(age) = age {
                editor.set_age(Some(age));
            }
            if let Some(gender) = gender {
                editor.set_gender(&gender);
            }
            if let Some(bio) = bio {
                editor.set_bio(&bio);
            }
            if let Some(institution) = institution {
                editor.set_institution(&institution);
            }
            if lat.is_some() || lon.is_some() {
                editor.set_location(lat, lon);
            }
            let outcome = editor.save(ctx).await?;
            print_saved(&editor, outcome);
        }
        ProfileAction::Interest { labels } => {
            for label in &labels {
                editor.toggle_interest(label);
            }
            let outcome = editor.save(ctx).await?;
            println!("Interests: {}", editor.profile().interests.join(", "));
            print_saved(&editor, outcome);
        }
        ProfileAction::Upload { path, primary } => {
            upload(&mut editor, ctx, &path, primary).await?;
            if let Some(line) = render::notice(editor.notice()) {
                println!("{line}");
            }
            println!("You now have {} photo(s).", editor.photos().len());
        }
    }
    Ok(())
}

/// Interactive first-run wizard. Errors are shown inline and the step repeats.
pub async fn onboard(ctx: &AppContextInner) -> Result<()> {
    let mut flow = OnboardingFlow::new(editor(ctx).await?);
    let mut input = Input::new();
    let total = OnboardingStep::ORDER.len();

    loop {
        let step = flow.step();
        println!();
        println!("Step {}/{}: {}", step.index() + 1, total, step.title());
        println!("  (Enter to continue, `back` to go back, `quit` to stop)");

        let prompt = match step {
            OnboardingStep::Photo => "Photo path: ",
            OnboardingStep::Institution => "School or workplace: ",
            OnboardingStep::Bio => "Bio: ",
            OnboardingStep::Interests => {
                println!("  Choices: {}", flow.editor().interest_choices().join(", "));
                println!("  Selected: {}", flow.editor().profile().interests.join(", "));
                "Toggle interest: "
            }
        };
        let Some(answer) = input.ask(prompt).await? else {
            bail!("Onboarding interrupted");
        };

        match answer.as_str() {
            "quit" => return Ok(()),
            "back" => {
                flow.back();
                continue;
            }
            "" => {}
            value => {
                let applied = match step {
                    OnboardingStep::Photo => {
                        let primary = flow.editor().photos().is_empty();
                        upload(flow.editor_mut(), ctx, Path::new(value), primary).await
                    }
                    OnboardingStep::Institution => {
                        flow.editor_mut().set_institution(value);
                        Ok(())
                    }
                    OnboardingStep::Bio => {
                        flow.editor_mut().set_bio(value);
                        Ok(())
                    }
                    OnboardingStep::Interests => {
                        flow.editor_mut().toggle_interest(value);
                        Ok(())
                    }
                };
                if let Err(e) = applied {
                    println!("  ✗ {e}");
                }
                // photos and interests can take several answers
                if step == OnboardingStep::Interests || step == OnboardingStep::Photo {
                    continue;
                }
            }
        }

        match flow.advance(ctx).await {
            Ok(Advance::Blocked) => println!("  - {}", step.field().hint()),
            Ok(Advance::Moved(_)) => {}
            Ok(Advance::Finished(route)) => {
                println!("All done!");
                println!("{}", render::route_hint(&route));
                return Ok(());
            }
            Ok(Advance::Dismissed) => return Ok(()),
            Err(e) => println!("  ✗ {e}"),
        }
    }
}
