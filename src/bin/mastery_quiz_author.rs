use log::{error, info};
use mastery_quiz::authoring::QuizDraft;
use mastery_quiz::config::QuizConfig;
use mastery_quiz::remote::RestBackend;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (path, dry_run) = match (args.next(), args.next()) {
        (Some(flag), Some(path)) if flag == "--check" => (path, true),
        (Some(path), None) => (path, false),
        _ => {
            eprintln!("uso: mastery_quiz_author [--check] <borrador.yaml>");
            return ExitCode::from(2);
        }
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            error!("No se pudo leer {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let quiz = match QuizDraft::from_yaml(&text).map_err(|e| e.to_string()).and_then(|draft| {
        draft.validate().map_err(|e| e.to_string())
    }) {
        Ok(quiz) => quiz,
        Err(err) => {
            eprintln!("❌ Borrador inválido: {err}");
            return ExitCode::FAILURE;
        }
    };

    if dry_run {
        println!(
            "✅ Borrador válido: {} ({} pasos)",
            quiz.main.difficulty,
            quiz.subs.len()
        );
        return ExitCode::SUCCESS;
    }

    let config = match QuizConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("Configuración inválida: {err}");
            return ExitCode::FAILURE;
        }
    };

    let backend = match RestBackend::new(&config.backend, config.batch_size) {
        Ok(backend) => backend,
        Err(err) => {
            eprintln!("❌ {err} (define MASTERY_QUIZ_BACKEND_URL)");
            return ExitCode::FAILURE;
        }
    };

    match backend.publish_quiz(&quiz) {
        Ok(id) => {
            info!("Publicado en {}", backend.base_url());
            println!("✅ Quiz creado con id {id}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("❌ No se pudo publicar: {err}");
            ExitCode::FAILURE
        }
    }
}
