use std::error::Error;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
}

impl Default for OpenaiClient {
    fn default() -> Self {
        OpenaiClient {
            client: Client::new(),
        }
    }
}

impl OpenaiClient {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
        }
    }

    /// Ask the model for book title ideas built around one keyword. Provider
    /// failures bubble up so the caller can report them per keyword.
    pub async fn generate_titles(
        &self,
        keyword: &str,
        count: u8,
    ) -> Result<Vec<String>, Box<dyn Error>> {
        let prompt = format!(
            "Generate {} original, catchy titles for a book based on the keyword: \"{}\". \
             Give each title on a new line without numbering or bullet points.",
            count, keyword
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model("gpt-4o")
            .temperature(0.7)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content("You are a professional author on Amazon KDP.")
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .max_tokens(1000_u32)
            .build()?;

        let response = self.client.chat().create(request).await?;
        log::info!("Title generation response: {:?}", response);

        let first_choice = response
            .choices
            .first()
            .ok_or("No choices in Openai response")?
            .message
            .content
            .clone()
            .ok_or("No content")?;

        Ok(split_titles(&first_choice))
    }
}

/// One title per line; the model sometimes numbers or bullets the list
/// anyway, so leading markers are stripped.
pub fn split_titles(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')', '-', '*'])
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_titles;

    #[test]
    fn splits_plain_lines_and_drops_blanks() {
        let titles = split_titles("Il gatto curioso\n\nRicette per due\n");
        assert_eq!(titles, vec!["Il gatto curioso", "Ricette per due"]);
    }

    #[test]
    fn strips_numbering_and_bullets() {
        let titles = split_titles("1. Primo titolo\n2) Secondo titolo\n- Terzo titolo\n* Quarto");
        assert_eq!(
            titles,
            vec!["Primo titolo", "Secondo titolo", "Terzo titolo", "Quarto"]
        );
    }
}
