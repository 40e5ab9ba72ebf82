#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use log::{error, info};
    use mastery_quiz::QuizApp;
    use mastery_quiz::config::QuizConfig;

    env_logger::init();

    let config = match QuizConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("Configuración inválida, se usan los valores por defecto: {err}");
            QuizConfig::default()
        }
    };
    info!(
        "Presupuesto por pregunta {}s, objetivos {:?}",
        config.question_seconds, config.thresholds
    );

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Quiz de matemáticas por niveles",
        options,
        Box::new(move |cc| {
            let saved = cc
                .storage
                .and_then(|storage| eframe::get_value::<QuizApp>(storage, eframe::APP_KEY));
            Ok(Box::new(QuizApp::restored(saved, config)))
        }),
    )
}

// En wasm la app la arranca el host web.
#[cfg(target_arch = "wasm32")]
fn main() {}
